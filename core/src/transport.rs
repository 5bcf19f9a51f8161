//! The seam between the stateless core and whatever performs HTTP.
//!
//! Implementations must issue exactly one GET per call, must not retry
//! behind the caller's back, and must be usable from several threads at
//! once.

/// Performs a single HTTP GET and returns the raw response body.
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, url: &str) -> Result<Vec<u8>, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Error = T::Error;

    fn get(&self, url: &str) -> Result<Vec<u8>, Self::Error> {
        (**self).get(url)
    }
}

/// Blocking transport backed by `ureq`.
///
/// Non-2xx statuses and I/O failures surface as `ureq::Error`.
#[cfg(feature = "ureq")]
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

#[cfg(feature = "ureq")]
impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

#[cfg(feature = "ureq")]
impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ureq")]
impl Transport for UreqTransport {
    type Error = ureq::Error;

    fn get(&self, url: &str) -> Result<Vec<u8>, Self::Error> {
        let response = self.agent.get(url).call()?;
        response.into_body().read_to_vec()
    }
}
