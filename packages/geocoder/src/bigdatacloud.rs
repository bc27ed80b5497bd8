//! `BigDataCloud` reverse geocoding client.
//!
//! One GET per coordinate pair, no batching or caching.
//!
//! See <https://www.bigdatacloud.com/reverse-geocoding>

use async_trait::async_trait;
use quake_feed_quake_models::LocationInfo;

use crate::service_registry::GeocodingService;
use crate::{GeocodeError, ReverseGeocoder};

/// Reverse geocoder backed by the `BigDataCloud` API.
pub struct BigDataCloudGeocoder {
    client: reqwest::Client,
    service: GeocodingService,
    api_key: Option<String>,
}

impl BigDataCloudGeocoder {
    /// Creates a geocoder for the given service configuration. The key is
    /// sent as the `key` query parameter when present.
    #[must_use]
    pub const fn new(
        client: reqwest::Client,
        service: GeocodingService,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            service,
            api_key,
        }
    }

    /// Looks up a single coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request fails, the service returns a
    /// non-success status, or the body is not a JSON object.
    pub async fn lookup(&self, latitude: f64, longitude: f64) -> Result<LocationInfo, GeocodeError> {
        let mut query = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("localityLanguage", self.service.locality_language.clone()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }

        let resp = self
            .client
            .get(&self.service.base_url)
            .query(&query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body)
    }
}

#[async_trait]
impl ReverseGeocoder for BigDataCloudGeocoder {
    async fn resolve(&self, latitude: f64, longitude: f64) -> LocationInfo {
        match self.lookup(latitude, longitude).await {
            Ok(location) => location,
            Err(e) => {
                log::warn!("Reverse geocoding failed for ({latitude}, {longitude}): {e}");
                LocationInfo::unknown()
            }
        }
    }
}

/// Parses a reverse geocoding response body.
fn parse_response(body: &serde_json::Value) -> Result<LocationInfo, GeocodeError> {
    let object = body.as_object().ok_or_else(|| GeocodeError::Parse {
        message: "Reverse geocoding response is not an object".to_string(),
    })?;

    let field = |name: &str| object.get(name).and_then(serde_json::Value::as_str);

    Ok(LocationInfo::from_parts(
        field("principalSubdivision"),
        field("countryName"),
        field("continent"),
        field("locality"),
    ))
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use super::*;

    /// Serves one canned HTTP response per connection and returns the base URL.
    async fn serve_canned(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{addr}/data/reverse-geocode")
    }

    /// Answers one request with an empty JSON object and hands back its
    /// request line.
    async fn serve_capturing() -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);
            let response = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}";
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        });
        (format!("http://{addr}/data/reverse-geocode"), rx)
    }

    fn geocoder_with_key(base_url: String, api_key: Option<&str>) -> BigDataCloudGeocoder {
        BigDataCloudGeocoder::new(
            reqwest::Client::new(),
            GeocodingService {
                id: "bigdatacloud".to_string(),
                name: "BigDataCloud".to_string(),
                base_url,
                locality_language: "en".to_string(),
            },
            api_key.map(str::to_string),
        )
    }

    fn geocoder(base_url: String) -> BigDataCloudGeocoder {
        geocoder_with_key(base_url, Some("test-key"))
    }

    #[test]
    fn parses_full_response() {
        let body = serde_json::json!({
            "latitude": 14.5,
            "longitude": 120.1,
            "principalSubdivision": "Calabarzon",
            "countryName": "Philippines",
            "continent": "Asia",
            "locality": "Nasugbu"
        });
        let location = parse_response(&body).unwrap();
        assert_eq!(location.region, "Calabarzon");
        assert_eq!(location.country, "Philippines");
        assert_eq!(location.continent, "Asia");
        assert_eq!(location.locality, "Nasugbu");
    }

    #[test]
    fn missing_and_empty_fields_are_unknown() {
        let body = serde_json::json!({
            "principalSubdivision": "",
            "countryName": "Philippines",
            "continent": null
        });
        let location = parse_response(&body).unwrap();
        assert_eq!(location.region, "Unknown");
        assert_eq!(location.country, "Philippines");
        assert_eq!(location.continent, "Unknown");
        assert_eq!(location.locality, "Unknown");
    }

    #[test]
    fn rejects_non_object_body() {
        let body = serde_json::json!([1, 2, 3]);
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn resolves_successful_lookup() {
        let url = serve_canned(
            "200 OK",
            r#"{"principalSubdivision":"Calabarzon","countryName":"Philippines","continent":"Asia","locality":"Nasugbu"}"#,
        )
        .await;
        let location = geocoder(url).resolve(14.5, 120.1).await;
        assert_eq!(location.country, "Philippines");
        assert_eq!(location.locality, "Nasugbu");
    }

    #[tokio::test]
    async fn service_unavailable_degrades_to_unknown() {
        let url = serve_canned("503 Service Unavailable", "").await;
        let geocoder = geocoder(url);

        let err = geocoder.lookup(14.5, 120.1).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Status { status: 503 }));

        let location = geocoder.resolve(14.5, 120.1).await;
        assert!(location.is_unknown());
    }

    #[tokio::test]
    async fn unreachable_service_degrades_to_unknown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let location = geocoder(format!("http://{addr}/")).resolve(0.0, 0.0).await;
        assert!(location.is_unknown());
    }

    #[tokio::test]
    async fn garbled_body_degrades_to_unknown() {
        let url = serve_canned("200 OK", "not json").await;
        let location = geocoder(url).resolve(1.0, 2.0).await;
        assert!(location.is_unknown());
    }

    #[tokio::test]
    async fn sends_coordinates_language_and_key() {
        let (url, request_line) = serve_capturing().await;
        geocoder(url).lookup(14.5, 120.1).await.unwrap();

        let request_line = request_line.await.unwrap();
        assert!(request_line.starts_with("GET /data/reverse-geocode?"), "{request_line}");
        assert!(request_line.contains("latitude=14.5"), "{request_line}");
        assert!(request_line.contains("longitude=120.1"), "{request_line}");
        assert!(request_line.contains("localityLanguage=en"), "{request_line}");
        assert!(request_line.contains("&key=test-key"), "{request_line}");
    }

    #[tokio::test]
    async fn omits_key_when_not_configured() {
        let (url, request_line) = serve_capturing().await;
        let location = geocoder_with_key(url, None).lookup(-33.9, 18.4).await.unwrap();
        assert!(location.is_unknown());

        let request_line = request_line.await.unwrap();
        assert!(request_line.contains("latitude=-33.9"), "{request_line}");
        assert!(request_line.contains("longitude=18.4"), "{request_line}");
        assert!(request_line.contains("localityLanguage=en"), "{request_line}");
        assert!(!request_line.contains("key="), "{request_line}");
    }
}
