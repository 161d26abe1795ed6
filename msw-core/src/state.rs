//! Mutable request configuration owned by a single client.

use crate::{
    config::ClientConfig,
    error::ConfigError,
    model::{SpotId, Units, validate_field},
};

pub const DEFAULT_BASE_URL: &str = "http://magicseaweed.com/api";

/// API key, spot, units and field filter used to build the next request.
///
/// Every fallible mutator validates before writing, so a rejected call leaves
/// the state exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    api_key: String,
    spot_id: SpotId,
    units: Units,
    fields: Vec<String>,
    base_url: String,
}

impl ClientState {
    /// Validate a construction config. `apikey` and `spot_id` are required.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        if !config.unknown_keys.is_empty() {
            tracing::warn!(
                keys = ?config.unknown_keys,
                "Ignoring unrecognized client configuration keys"
            );
        }

        let api_key = config.apikey.ok_or(ConfigError::MissingApiKey)?;
        let spot_id = config.spot_id.ok_or(ConfigError::MissingSpotId)?;
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let mut state = Self {
            api_key,
            spot_id,
            units: config.units.unwrap_or_default(),
            fields: Vec::new(),
            base_url,
        };
        state.add_fields(config.fields)?;

        Ok(state)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_spot_id<I>(&mut self, id: I) -> Result<&mut Self, ConfigError>
    where
        I: TryInto<SpotId>,
        ConfigError: From<I::Error>,
    {
        self.spot_id = id.try_into()?;
        Ok(self)
    }

    pub fn spot_id(&self) -> SpotId {
        self.spot_id
    }

    pub fn set_units<U>(&mut self, units: U) -> Result<&mut Self, ConfigError>
    where
        U: TryInto<Units>,
        ConfigError: From<U::Error>,
    {
        self.units = units.try_into()?;
        Ok(self)
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Add a field to the filter. Adding a field that is already present is a no-op.
    ///
    /// Names are written into the query string verbatim, so an empty name or
    /// one containing whitespace, `,`, `&`, `=`, `#` or `?` is rejected with
    /// [`ConfigError::InvalidField`].
    pub fn add_field(&mut self, name: impl AsRef<str>) -> Result<&mut Self, ConfigError> {
        let name = name.as_ref();
        validate_field(name)?;
        self.push_unique(name);
        Ok(self)
    }

    /// Add several fields in order. Nothing is added unless every name is valid.
    pub fn add_fields<I, S>(&mut self, names: I) -> Result<&mut Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        for name in &names {
            validate_field(name.as_ref())?;
        }
        for name in &names {
            self.push_unique(name.as_ref());
        }
        Ok(self)
    }

    /// Remove a field; absent names are ignored.
    pub fn remove_field(&mut self, name: &str) -> &mut Self {
        self.fields.retain(|f| f != name);
        self
    }

    pub fn remove_all_fields(&mut self) -> &mut Self {
        self.fields.clear();
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Render `<base>/<apikey>/forecast?spot_id=<id>[&units=<u>][&fields=<f1>,<f2>]`.
    ///
    /// `units` is omitted for the default (`uk`) and `fields` when the filter
    /// is empty. Field names are written verbatim, without percent-encoding.
    pub fn request_endpoint(&self) -> String {
        let mut endpoint = format!(
            "{}/{}/forecast?spot_id={}",
            self.base_url, self.api_key, self.spot_id
        );

        if !self.units.is_default() {
            endpoint.push_str("&units=");
            endpoint.push_str(self.units.as_str());
        }

        if !self.fields.is_empty() {
            endpoint.push_str("&fields=");
            endpoint.push_str(&self.fields.join(","));
        }

        endpoint
    }

    fn push_unique(&mut self, name: &str) {
        if !self.fields.iter().any(|f| f == name) {
            self.fields.push(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ClientState {
        ClientState::new(ClientConfig::new("apikey", 1).unwrap()).expect("valid config")
    }

    #[test]
    fn new_requires_api_key() {
        let cfg = ClientConfig {
            spot_id: Some(SpotId::try_from(1).unwrap()),
            ..ClientConfig::default()
        };
        assert_eq!(ClientState::new(cfg).unwrap_err(), ConfigError::MissingApiKey);
    }

    #[test]
    fn new_requires_spot_id() {
        let cfg = ClientConfig {
            apikey: Some("apikey".into()),
            ..ClientConfig::default()
        };
        assert_eq!(ClientState::new(cfg).unwrap_err(), ConfigError::MissingSpotId);
    }

    #[test]
    fn new_applies_defaults() {
        let s = state();
        assert_eq!(s.api_key(), "apikey");
        assert_eq!(s.spot_id().get(), 1);
        assert_eq!(s.units(), Units::Uk);
        assert!(s.fields().is_empty());
        assert_eq!(s.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn new_takes_optional_units_and_deduplicated_fields() {
        let mut cfg = ClientConfig::new("apikey", 5).unwrap();
        cfg.units = Some(Units::Us);
        cfg.fields = vec!["timestamp".into(), "wind".into(), "timestamp".into()];

        let s = ClientState::new(cfg).unwrap();
        assert_eq!(s.units(), Units::Us);
        assert_eq!(s.fields(), ["timestamp", "wind"]);
    }

    #[test]
    fn new_rejects_invalid_config_field() {
        let mut cfg = ClientConfig::new("apikey", 5).unwrap();
        cfg.fields = vec!["wind".into(), "bad field".into()];

        assert!(matches!(ClientState::new(cfg), Err(ConfigError::InvalidField(_))));
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let mut cfg = ClientConfig::new("apikey", 1).unwrap();
        cfg.base_url = Some("http://localhost:8080/api/".into());

        let s = ClientState::new(cfg).unwrap();
        assert_eq!(s.request_endpoint(), "http://localhost:8080/api/apikey/forecast?spot_id=1");
    }

    #[test]
    fn set_spot_id_replaces_value() {
        let mut s = state();
        s.set_spot_id(1449).unwrap();
        assert_eq!(s.spot_id().get(), 1449);

        s.set_spot_id("22").unwrap();
        assert_eq!(s.spot_id().get(), 22);
    }

    #[test]
    fn set_spot_id_rejects_non_numeric_and_keeps_state() {
        let mut s = state();
        s.set_spot_id(7).unwrap();

        assert!(matches!(s.set_spot_id("abc"), Err(ConfigError::InvalidSpotId(_))));
        assert!(matches!(s.set_spot_id(-3), Err(ConfigError::InvalidSpotId(_))));
        assert!(matches!(s.set_spot_id(2.5), Err(ConfigError::InvalidSpotId(_))));
        assert_eq!(s.spot_id().get(), 7);
    }

    #[test]
    fn set_units_accepts_typed_and_lowercase_text() {
        let mut s = state();
        s.set_units(Units::Eu).unwrap();
        assert_eq!(s.units(), Units::Eu);

        s.set_units("us").unwrap();
        assert_eq!(s.units(), Units::Us);
    }

    #[test]
    fn set_units_rejects_uppercase_and_keeps_state() {
        let mut s = state();
        s.set_units("eu").unwrap();

        let err = s.set_units("US").unwrap_err();
        assert_eq!(err, ConfigError::InvalidUnits("US".into()));
        assert_eq!(s.units(), Units::Eu);
    }

    #[test]
    fn setters_chain() {
        let mut s = state();
        s.set_spot_id(1449)
            .unwrap()
            .set_units("us")
            .unwrap()
            .add_field("wind")
            .unwrap()
            .add_fields(["swell", "timestamp"])
            .unwrap()
            .remove_field("swell");

        assert_eq!(
            s.request_endpoint(),
            "http://magicseaweed.com/api/apikey/forecast?spot_id=1449&units=us&fields=wind,timestamp"
        );
    }

    #[test]
    fn add_field_does_not_duplicate() {
        let mut s = state();
        s.add_field("wind").unwrap().add_field("wind").unwrap();
        assert_eq!(s.fields(), ["wind"]);
    }

    #[test]
    fn add_fields_is_all_or_nothing() {
        let mut s = state();
        s.add_field("wind").unwrap();

        let err = s.add_fields(["timestamp", "", "swell"]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidField(String::new()));
        assert_eq!(s.fields(), ["wind"]);
    }

    #[test]
    fn add_fields_keeps_insertion_order() {
        let mut s = state();
        s.add_fields(vec!["c".to_string(), "a".to_string(), "b".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(s.fields(), ["c", "a", "b"]);
    }

    #[test]
    fn remove_field_ignores_absent_names() {
        let mut s = state();
        s.add_fields(["a", "b", "c"]).unwrap();

        s.remove_field("b").remove_field("missing");
        assert_eq!(s.fields(), ["a", "c"]);
    }

    #[test]
    fn removed_field_can_be_added_again_at_the_end() {
        let mut s = state();
        s.add_fields(["a", "b"]).unwrap();
        s.remove_field("a");
        s.add_field("a").unwrap();
        assert_eq!(s.fields(), ["b", "a"]);
    }

    #[test]
    fn remove_all_fields_is_idempotent() {
        let mut s = state();
        s.add_fields(["a", "b"]).unwrap();

        s.remove_all_fields();
        let once = s.fields().to_vec();
        s.remove_all_fields();

        assert!(once.is_empty());
        assert_eq!(s.fields(), once.as_slice());
    }

    #[test]
    fn endpoint_minimal() {
        assert_eq!(
            state().request_endpoint(),
            "http://magicseaweed.com/api/apikey/forecast?spot_id=1"
        );
    }

    #[test]
    fn endpoint_omits_default_units() {
        let mut s = state();
        s.set_units("us").unwrap();
        assert!(s.request_endpoint().ends_with("?spot_id=1&units=us"));

        s.set_units("uk").unwrap();
        assert!(!s.request_endpoint().contains("units"));
    }

    #[test]
    fn endpoint_renders_fields_in_order() {
        let mut s = state();
        s.add_fields(["field1", "field2", "field3"]).unwrap();
        assert!(s.request_endpoint().ends_with("&fields=field1,field2,field3"));
    }

    #[test]
    fn endpoint_places_fields_after_units() {
        let mut s = state();
        s.add_field("wind").unwrap().set_units("eu").unwrap();
        assert!(s.request_endpoint().ends_with("?spot_id=1&units=eu&fields=wind"));
    }

    #[test]
    fn clearing_fields_restores_plain_endpoint() {
        let mut s = state();
        let before = s.request_endpoint();

        s.add_fields(["a", "b"]).unwrap();
        assert_ne!(s.request_endpoint(), before);

        s.remove_all_fields();
        assert_eq!(s.request_endpoint(), before);
    }

    #[test]
    fn endpoint_tracks_every_mutation() {
        let mut s = state();
        s.set_spot_id(2).unwrap();
        assert!(s.request_endpoint().contains("spot_id=2"));
        s.set_spot_id(3).unwrap();
        assert!(s.request_endpoint().contains("spot_id=3"));
    }
}
