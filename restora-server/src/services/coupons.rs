//! 优惠券校验与核销
//!
//! 校验是纯读操作，任何时候调用都不改变券面状态；核销只在订单
//! 进入 completed 时发生一次，取消的订单永远不消耗额度。

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use chrono::Utc;

use crate::db::models::{Coupon, CouponQuote, CouponUse, DiscountType};
use crate::db::repository::CouponRepository;
use crate::orders::money::{round2, to_decimal, to_f64};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct CouponService {
    coupons: CouponRepository,
}

impl CouponService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            coupons: CouponRepository::new(db),
        }
    }

    /// 校验优惠券并报价（纯读）
    ///
    /// 依次检查：存在性、有效窗口/停用/总量、最低消费、人均限额。
    /// 通过后返回折扣与应付金额，折扣不超过订单金额。
    pub async fn validate(
        &self,
        code: &str,
        restaurant: &RecordId,
        user: &RecordId,
        order_amount: f64,
    ) -> AppResult<CouponQuote> {
        let code = normalize_code(code);
        let coupon = self
            .coupons
            .find_by_code(&code, restaurant)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid coupon code"))?;

        let now = Utc::now();
        let exhausted = coupon
            .usage_limit
            .is_some_and(|limit| coupon.usage_count >= limit);
        if !coupon.is_active || now < coupon.valid_from || now > coupon.valid_until || exhausted {
            return Err(AppError::validation("Coupon is expired or inactive"));
        }

        if order_amount < coupon.min_order_amount {
            return Err(AppError::validation(format!(
                "Minimum order amount for this coupon is {:.2}",
                coupon.min_order_amount
            )));
        }

        let used = user_usage(&coupon, user);
        if used >= coupon.user_usage_limit {
            return Err(AppError::validation("Coupon has already been used"));
        }

        Ok(quote(&coupon, order_amount))
    }

    /// 核销：累进总用量与该用户的台账条目
    ///
    /// 只在订单完成时调用一次，失败由调用方记日志，不回滚完成。
    pub async fn redeem(&self, code: &str, restaurant: &RecordId, user: &RecordId) -> AppResult<()> {
        let code = normalize_code(code);
        let coupon = self
            .coupons
            .find_by_code(&code, restaurant)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid coupon code"))?;
        let id = coupon
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Coupon record has no id"))?;

        let mut used_by = coupon.used_by;
        match used_by.iter_mut().find(|entry| entry.user == *user) {
            Some(entry) => entry.count += 1,
            None => used_by.push(CouponUse {
                user: user.clone(),
                count: 1,
            }),
        }

        self.coupons.record_use(&id, used_by).await?;
        tracing::info!(code, user = %user, "Coupon redeemed");
        Ok(())
    }
}

/// 码面规范化：去空白、统一大写
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn user_usage(coupon: &Coupon, user: &RecordId) -> i32 {
    coupon
        .used_by
        .iter()
        .find(|entry| entry.user == *user)
        .map(|entry| entry.count)
        .unwrap_or(0)
}

/// 报价：percentage 按比例并受上限约束，fixed 取面值，均不超过订单额
fn quote(coupon: &Coupon, order_amount: f64) -> CouponQuote {
    let amount = round2(to_decimal(order_amount));
    let raw = match coupon.discount_type {
        DiscountType::Percentage => {
            let pct = to_decimal(coupon.discount_value) / rust_decimal::Decimal::ONE_HUNDRED;
            let discount = round2(amount * pct);
            match coupon.max_discount_amount {
                Some(cap) => discount.min(round2(to_decimal(cap))),
                None => discount,
            }
        }
        DiscountType::Fixed => round2(to_decimal(coupon.discount_value)),
    };
    let discount = raw.min(amount);

    CouponQuote {
        discount_amount: to_f64(discount),
        final_amount: to_f64(amount - discount),
    }
}
