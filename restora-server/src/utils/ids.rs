//! 记录 ID 解析
//!
//! 对外接口同时接受裸 key 与完整 `table:key` 两种形态，
//! 完整形态的表名必须与期望一致。

use surrealdb::RecordId;

use crate::utils::AppError;

/// Parse a client-supplied id against the expected table
pub fn parse_ref(table: &str, raw: &str) -> Result<RecordId, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::validation(format!("Empty {} id", table)));
    }
    if raw.contains(':') {
        let id: RecordId = raw
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid ID: {}", raw)))?;
        if id.table() != table {
            return Err(AppError::validation(format!(
                "Expected a {} id, got: {}",
                table, raw
            )));
        }
        Ok(id)
    } else {
        Ok(RecordId::from_table_key(table, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_key_gets_the_table() {
        let id = parse_ref("user", "abc").unwrap();
        assert_eq!(id.to_string(), "user:abc");
    }

    #[test]
    fn full_form_must_match_table() {
        assert!(parse_ref("user", "user:abc").is_ok());
        assert!(parse_ref("user", "order:abc").is_err());
    }

    #[test]
    fn junk_is_rejected() {
        assert!(parse_ref("user", "").is_err());
        assert!(parse_ref("user", "   ").is_err());
    }
}
