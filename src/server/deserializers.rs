use serde::{Deserialize, Deserializer};

// query strings like `?page=abc` fall back to the default instead of failing the request
pub fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse::<i64>().ok()))
}

#[derive(Deserialize, Default)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn page_number(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}
