use crate::geo::distance::Coordinate;
use serde::Deserialize;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

const IP_API_URL: &str = "http://ip-api.com/json/";
const USER_AGENT: &str = "parktrack/0.1.0";

/// Fallback origin when no location is available: the geographic center of
/// the contiguous United States.
pub const DEFAULT_ORIGIN: (f64, f64) = (39.8283, -98.5795);

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// An external source of the user's current coordinate.
///
/// Implementations may block; callers go through [`request_location`] to get
/// single-shot delivery with a timeout.
pub trait LocationProvider: Send + 'static {
    fn locate(&self) -> Result<Coordinate, LocateError>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    message: Option<String>,
}

/// IP-based geolocation via ip-api.com. City-level accuracy, which is
/// plenty for nearest-park distances displayed to one decimal kilometer.
pub struct IpLocationProvider {
    timeout: Duration,
}

impl IpLocationProvider {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl LocationProvider for IpLocationProvider {
    fn locate(&self) -> Result<Coordinate, LocateError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| LocateError::Unavailable(e.to_string()))?;

        let response = client
            .get(IP_API_URL)
            .send()
            .map_err(|e| LocateError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LocateError::Unavailable(format!(
                "geolocation service returned status {}",
                response.status()
            )));
        }

        let body: IpApiResponse = response
            .json()
            .map_err(|e| LocateError::Unavailable(e.to_string()))?;

        if body.status != "success" {
            return Err(LocateError::Unavailable(
                body.message.unwrap_or_else(|| "lookup failed".to_string()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon)
                .map_err(|e| LocateError::Unavailable(e.to_string())),
            _ => Err(LocateError::Unavailable(
                "response missing coordinates".to_string(),
            )),
        }
    }
}

/// Fire a single-shot location request on a background thread.
///
/// Exactly one result is sent on the returned channel. The caller typically
/// waits with `recv_timeout`; if it gives up and drops the receiver, a late
/// result is discarded when the send fails - there is no cancellation.
pub fn request_location<P: LocationProvider>(
    provider: P,
) -> mpsc::Receiver<Result<Coordinate, LocateError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // A send after the receiver is gone is the ignorable-late-result
        // case; drop the error.
        let _ = tx.send(provider.locate());
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(f64, f64);

    impl LocationProvider for FixedProvider {
        fn locate(&self) -> Result<Coordinate, LocateError> {
            Ok(Coordinate::new(self.0, self.1).unwrap())
        }
    }

    struct FailingProvider;

    impl LocationProvider for FailingProvider {
        fn locate(&self) -> Result<Coordinate, LocateError> {
            Err(LocateError::Unavailable("permission denied".to_string()))
        }
    }

    struct SlowProvider;

    impl LocationProvider for SlowProvider {
        fn locate(&self) -> Result<Coordinate, LocateError> {
            thread::sleep(Duration::from_millis(200));
            Ok(Coordinate::new(1.0, 2.0).unwrap())
        }
    }

    #[test]
    fn test_request_delivers_coordinate() {
        let rx = request_location(FixedProvider(47.6, -122.3));
        let result = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        let coord = result.unwrap();
        assert_eq!(coord.lat(), 47.6);
        assert_eq!(coord.lon(), -122.3);
    }

    #[test]
    fn test_request_delivers_failure() {
        let rx = request_location(FailingProvider);
        let result = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(result, Err(LocateError::Unavailable(_))));
    }

    #[test]
    fn test_late_result_is_ignorable() {
        let rx = request_location(SlowProvider);
        // Give up before the provider resolves; dropping the receiver must
        // not panic the background thread.
        assert!(rx.recv_timeout(Duration::from_millis(10)).is_err());
        drop(rx);
        thread::sleep(Duration::from_millis(300));
    }

    #[test]
    fn test_parse_ip_api_response() {
        let json = r#"{"status":"success","lat":37.7749,"lon":-122.4194,"city":"San Francisco"}"#;
        let body: IpApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "success");
        assert_eq!(body.lat, Some(37.7749));

        let json = r#"{"status":"fail","message":"private range"}"#;
        let body: IpApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "fail");
        assert_eq!(body.message.as_deref(), Some("private range"));
    }

    #[test]
    fn test_default_origin_is_valid() {
        let (lat, lon) = DEFAULT_ORIGIN;
        assert!(Coordinate::new(lat, lon).is_ok());
    }
}
