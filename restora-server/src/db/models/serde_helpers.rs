//! 记录 ID 的双形态适配
//!
//! 同一个字段会遇到两种来源：HTTP JSON 携带 `"table:key"` 文本，
//! 数据库查询返回原生记录链接。模型统一通过这里的 `with` 模块声明，
//! 序列化一律落成文本，反序列化两种来源都接受。

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// 布尔字段缺失/为 null 时按 true 处理
pub fn bool_or_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|v| v.unwrap_or(true))
}

/// 布尔字段缺失/为 null 时按 false 处理
pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|v| v.unwrap_or(false))
}

/// 文本或原生链接，两种形态都落回 `RecordId`
fn decode<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = RecordId;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("record id as 'table:key' text or a native record link")
        }

        fn visit_str<E>(self, text: &str) -> Result<RecordId, E>
        where
            E: de::Error,
        {
            text.parse()
                .map_err(|_| E::custom(format!("malformed record id: {text}")))
        }

        fn visit_map<M>(self, entries: M) -> Result<RecordId, M::Error>
        where
            M: MapAccess<'de>,
        {
            RecordId::deserialize(de::value::MapAccessDeserializer::new(entries))
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// 供容器形态 (`Option` / `Vec`) 复用 [`decode`] 的薄包装
struct Flexible(RecordId);

impl<'de> Deserialize<'de> for Flexible {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        decode(d).map(Flexible)
    }
}

/// 必有值的记录 ID 字段
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::decode(d)
    }
}

/// 可空的记录 ID 字段 (典型例子: 未持久化实体的 `id`)
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Flexible>::deserialize(d).map(|v| v.map(|f| f.0))
    }
}

/// 记录 ID 列表字段 (会话参与者等)
pub mod vec_record_id {
    use super::*;

    pub fn serialize<S>(ids: &[RecordId], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_seq(ids.iter().map(RecordId::to_string))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Vec<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Flexible>::deserialize(d).map(|v| v.into_iter().map(|f| f.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Doc {
        #[serde(with = "record_id")]
        owner: RecordId,
    }

    #[test]
    fn text_form_round_trips() {
        let doc: Doc = serde_json::from_str(r#"{"owner":"user:abc"}"#).unwrap();
        assert_eq!(doc.owner.to_string(), "user:abc");

        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"owner":"user:abc"}"#);
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(serde_json::from_str::<Doc>(r#"{"owner":"no-colon"}"#).is_err());
    }
}
