use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub employee_id: Uuid,
    pub business_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub service_duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(with = "rfc3339_list")]
    pub available_slots: Vec<OffsetDateTime>,
}

impl AvailabilityResponse {
    pub fn empty(date: OffsetDateTime) -> Self {
        Self {
            date,
            available_slots: Vec::new(),
        }
    }
}

mod rfc3339_list {
    use serde::{de, ser::SerializeSeq, Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::OffsetDateTime;

    pub fn serialize<S: Serializer>(
        slots: &[OffsetDateTime],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(slots.len()))?;
        for slot in slots {
            let formatted = slot
                .format(&Rfc3339)
                .map_err(serde::ser::Error::custom)?;
            seq.serialize_element(&formatted)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<OffsetDateTime>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|raw| OffsetDateTime::parse(raw, &Rfc3339).map_err(de::Error::custom))
            .collect()
    }
}
