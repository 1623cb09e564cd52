use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};

use crate::{IdentityError, StorageKey};

/// Who the verses are fetched for. Replaced wholesale, never edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub temple: String,
    #[serde(with = "generation_text")]
    pub generation: NonZeroU32,
    pub name: String,
}

impl Identity {
    /// Validates raw form input.
    pub fn new(temple: &str, generation: &str, name: &str) -> Result<Self, IdentityError> {
        let temple = temple.trim();
        if temple.is_empty() {
            return Err(IdentityError::EmptyTemple);
        }
        let generation = generation
            .trim()
            .parse::<NonZeroU32>()
            .map_err(|_| IdentityError::InvalidGeneration(generation.to_owned()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        Ok(Self {
            temple: temple.to_owned(),
            generation,
            name: name.to_owned(),
        })
    }

    pub fn query(&self) -> VerseQuery {
        VerseQuery {
            name: self.name.clone(),
            temple: self.temple.clone(),
            batch: self.generation.get(),
        }
    }
}

impl StorageKey for Identity {
    const KEY: &'static str = "advent:identity";
}

/// Query parameters for the verse-listing endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerseQuery {
    pub name: String,
    pub temple: String,
    pub batch: u32,
}

impl VerseQuery {
    pub fn pairs(&self) -> [(&'static str, String); 3] {
        [
            ("name", self.name.clone()),
            ("temple", self.temple.clone()),
            ("batch", self.batch.to_string()),
        ]
    }
}

// Persisted the way it was submitted: as decimal text.
mod generation_text {
    use core::num::NonZeroU32;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &NonZeroU32, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(value)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NonZeroU32, D::Error> {
        let text = String::deserialize(de)?;
        text.trim().parse().map_err(serde::de::Error::custom)
    }
}

/// Gate that keeps at most one identity submission outstanding.
#[derive(Clone, Debug, Default)]
pub struct SubmissionGate {
    in_flight: Option<Identity>,
}

impl SubmissionGate {
    pub fn begin(&mut self, identity: Identity) -> Result<VerseQuery, crate::SubmitError> {
        if self.in_flight.is_some() {
            log::debug!("ignoring submit while another is in flight");
            return Err(crate::SubmitError::InFlight);
        }
        let query = identity.query();
        self.in_flight = Some(identity);
        Ok(query)
    }

    /// Releases the gate, returning the identity that was being submitted.
    pub fn finish(&mut self) -> Option<Identity> {
        self.in_flight.take()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubmitError;

    #[test]
    fn trims_and_parses_form_input() {
        let identity = Identity::new(" 강남성전 ", "3", "홍길동 ").unwrap();

        assert_eq!(identity.temple, "강남성전");
        assert_eq!(identity.generation.get(), 3);
        assert_eq!(identity.name, "홍길동");
    }

    #[test]
    fn rejects_blank_or_invalid_fields() {
        assert_eq!(Identity::new("", "3", "a"), Err(IdentityError::EmptyTemple));
        assert_eq!(Identity::new("t", "3", "   "), Err(IdentityError::EmptyName));
        assert_eq!(
            Identity::new("t", "0", "a"),
            Err(IdentityError::InvalidGeneration("0".into()))
        );
        assert_eq!(
            Identity::new("t", "three", "a"),
            Err(IdentityError::InvalidGeneration("three".into()))
        );
    }

    #[test]
    fn generation_is_persisted_as_text() {
        let identity = Identity::new("강남성전", "3", "홍길동").unwrap();
        let json = serde_json::to_string(&identity).unwrap();

        assert_eq!(json, r#"{"temple":"강남성전","generation":"3","name":"홍길동"}"#);
        assert_eq!(serde_json::from_str::<Identity>(&json).unwrap(), identity);
    }

    #[test]
    fn query_pairs_use_api_parameter_names() {
        let query = Identity::new("강남성전", "12", "홍길동").unwrap().query();

        assert_eq!(
            query.pairs(),
            [
                ("name", "홍길동".to_string()),
                ("temple", "강남성전".to_string()),
                ("batch", "12".to_string()),
            ]
        );
    }

    #[test]
    fn second_submit_is_rejected_until_first_finishes() {
        let mut gate = SubmissionGate::default();
        let identity = Identity::new("t", "1", "a").unwrap();

        assert!(gate.begin(identity.clone()).is_ok());
        assert_eq!(gate.begin(identity.clone()), Err(SubmitError::InFlight));
        assert_eq!(gate.finish(), Some(identity.clone()));
        assert!(!gate.is_in_flight());
        assert!(gate.begin(identity).is_ok());
    }
}
