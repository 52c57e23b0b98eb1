//! IP-based geolocation against ip-api.com.
//!
//! This is a separate, explicitly requested lookup. The resolver never falls
//! through to it; its failure mode is the fixed default coordinate only.

use serde::{Deserialize, Serialize};
use std::error::Error;

/// Response shape of the ip-api.com JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpLocationResponse {
    pub status: String,
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub region_name: String,
    pub city: String,
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub isp: String,
    pub org: String,
    #[serde(rename = "as")]
    pub asn: String,
    pub query: String,
}

/// Look up the host's approximate location by public IP address.
pub async fn lookup() -> Result<IpLocationResponse, Box<dyn Error>> {
    let client = reqwest::Client::new();
    let resp: IpLocationResponse = client
        .get("http://ip-api.com/json")
        .send()
        .await?
        .json()
        .await?;
    if resp.status != "success" {
        return Err(format!("IP geolocation failed with status '{}'", resp.status).into());
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "success",
        "country": "United States",
        "countryCode": "US",
        "region": "KS",
        "regionName": "Kansas",
        "city": "Lebanon",
        "zip": "66952",
        "lat": 39.8101,
        "lon": -98.5562,
        "timezone": "America/Chicago",
        "isp": "Example ISP",
        "org": "Example Org",
        "as": "AS64500 Example",
        "query": "203.0.113.7"
    }"#;

    #[test]
    fn deserializes_ip_api_shape() {
        let resp: IpLocationResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(resp.status, "success");
        assert_eq!(resp.country_code, "US");
        assert_eq!(resp.region_name, "Kansas");
        assert_eq!(resp.asn, "AS64500 Example");
        assert!((resp.lat - 39.8101).abs() < 1e-9);
        assert!((resp.lon - -98.5562).abs() < 1e-9);
    }

    #[test]
    fn round_trips_renamed_fields() {
        let resp: IpLocationResponse = serde_json::from_str(SAMPLE).unwrap();
        let out = serde_json::to_value(&resp).unwrap();
        assert_eq!(out["countryCode"], "US");
        assert_eq!(out["as"], "AS64500 Example");
    }
}
