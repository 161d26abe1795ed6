use crate::{
    config::ClientConfig,
    error::{ConfigError, RequestError},
    model::{Forecast, SpotId, Units},
    pipeline,
    state::ClientState,
    transport::{HttpTransport, Transport},
};

/// Client for the Magic Seaweed forecast endpoint.
///
/// The configuration setters validate synchronously and chain:
///
/// ```no_run
/// # async fn demo() -> anyhow::Result<()> {
/// use msw_core::{ClientConfig, MswClient};
///
/// let mut msw = MswClient::new(ClientConfig::new("YOUR_API_KEY", 1449)?)?;
/// msw.set_units("us")?.add_fields(["timestamp", "wind"])?;
///
/// let forecast = msw.request().await?;
/// println!("{} entries", forecast.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MswClient<T = HttpTransport> {
    state: ClientState,
    transport: T,
}

impl MswClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> MswClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ConfigError> {
        Ok(Self {
            state: ClientState::new(config)?,
            transport,
        })
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn set_spot_id<I>(&mut self, id: I) -> Result<&mut Self, ConfigError>
    where
        I: TryInto<SpotId>,
        ConfigError: From<I::Error>,
    {
        self.state.set_spot_id(id)?;
        Ok(self)
    }

    pub fn spot_id(&self) -> SpotId {
        self.state.spot_id()
    }

    pub fn set_units<U>(&mut self, units: U) -> Result<&mut Self, ConfigError>
    where
        U: TryInto<Units>,
        ConfigError: From<U::Error>,
    {
        self.state.set_units(units)?;
        Ok(self)
    }

    pub fn units(&self) -> Units {
        self.state.units()
    }

    /// See [`ClientState::add_field`] for the accepted names.
    pub fn add_field(&mut self, name: impl AsRef<str>) -> Result<&mut Self, ConfigError> {
        self.state.add_field(name)?;
        Ok(self)
    }

    pub fn add_fields<I, S>(&mut self, names: I) -> Result<&mut Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.state.add_fields(names)?;
        Ok(self)
    }

    pub fn remove_field(&mut self, name: &str) -> &mut Self {
        self.state.remove_field(name);
        self
    }

    pub fn remove_all_fields(&mut self) -> &mut Self {
        self.state.remove_all_fields();
        self
    }

    pub fn fields(&self) -> &[String] {
        self.state.fields()
    }

    pub fn request_endpoint(&self) -> String {
        self.state.request_endpoint()
    }

    /// Fetch the forecast for the current configuration.
    ///
    /// The endpoint is rendered once, when the call starts.
    pub async fn request(&self) -> Result<Forecast, RequestError> {
        let endpoint = self.state.request_endpoint();
        pipeline::execute(&self.transport, &endpoint).await
    }

    /// Callback form of [`request`](Self::request): the single outcome is
    /// handed to `callback` and its return value is passed through.
    pub async fn request_with<F, R>(&self, callback: F) -> R
    where
        F: FnOnce(Result<Forecast, RequestError>) -> R,
    {
        callback(self.request().await)
    }
}
