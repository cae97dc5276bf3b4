use serde::{Deserialize, Serialize};

/// A park record as served by `GET /api/parks`.
///
/// `id` is an opaque string (NPS park code in practice) and is matched
/// exactly against the visited set - no trimming or case folding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Park {
    pub id: String,
    pub name: String,
    pub state: String,
    pub lat: f64,
    pub lon: f64,
}

/// Response of `GET /api/park/{id}`.
///
/// The backend may answer with just the bare park record (no NPS API key
/// configured server-side), so everything beyond `park` is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ParkDetail {
    pub park: Park,
    #[serde(default)]
    pub nps: Option<NpsInfo>,
    #[serde(default, rename = "bestTimeToGo")]
    pub best_time_to_go: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Extended info sourced from the NPS API, relayed by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct NpsInfo {
    #[serde(default, rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "directionsInfo")]
    pub directions_info: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub images: Vec<NpsImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpsImage {
    pub url: String,
    #[serde(default, rename = "altText")]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl NpsImage {
    /// Caption for display: alt text, then title, then empty.
    pub fn caption(&self) -> &str {
        self.alt_text
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("")
    }
}

/// Latitude-banded fallback for when the detail response omits
/// `bestTimeToGo`: far-north parks have a short summer window, far-south
/// parks are better outside the hot season.
pub fn best_time_to_go(lat: f64) -> &'static str {
    if lat >= 55.0 {
        "Summer (short season)"
    } else if lat <= 32.0 {
        "Fall or Winter (milder)"
    } else {
        "Spring or Fall"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_time_bands() {
        assert_eq!(best_time_to_go(63.0), "Summer (short season)"); // Denali
        assert_eq!(best_time_to_go(25.3), "Fall or Winter (milder)"); // Everglades
        assert_eq!(best_time_to_go(44.4), "Spring or Fall"); // Yellowstone
    }

    #[test]
    fn test_detail_without_nps_block() {
        let json = r#"{
            "park": {"id": "acad", "name": "Acadia", "state": "ME", "lat": 44.36, "lon": -68.21},
            "note": "No NPS API key configured."
        }"#;
        let detail: ParkDetail = serde_json::from_str(json).unwrap();
        assert!(detail.nps.is_none());
        assert!(detail.best_time_to_go.is_none());
        assert_eq!(detail.note.as_deref(), Some("No NPS API key configured."));
    }

    #[test]
    fn test_image_caption_fallbacks() {
        let json = r#"{"url": "https://example.com/a.jpg", "title": "Cliffs"}"#;
        let img: NpsImage = serde_json::from_str(json).unwrap();
        assert_eq!(img.caption(), "Cliffs");

        let json = r#"{"url": "https://example.com/b.jpg"}"#;
        let img: NpsImage = serde_json::from_str(json).unwrap();
        assert_eq!(img.caption(), "");
    }
}
