use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Responses of the signed proxy API

#[derive(Deserialize, Debug)]
pub struct PlayoutResponse {
    pub playout: Playout,
}

#[derive(Deserialize, Debug)]
pub struct Playout {
    pub url: Option<String>,
    // bool, sometimes sent as "true" or 1
    #[serde(default)]
    pub drm: Value,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayableAssetResponse {
    pub product_model: ProductModel,
}

#[derive(Deserialize, Debug)]
pub struct ProductModel {
    pub playlist: PlaylistModel,
    pub show: Option<ShowModel>,
}

#[derive(Deserialize, Debug)]
pub struct PlaylistModel {
    // numeric in practice, sometimes quoted
    pub id: Value,
    #[serde(default)]
    pub count: Value,
}

#[derive(Deserialize, Debug)]
pub struct ShowModel {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductPlaylistResponse {
    pub product_list: Option<ProductList>,
}

#[derive(Deserialize, Debug)]
pub struct ProductList {
    pub products: Option<Vec<Product>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: Value,
    pub title: Option<String>,
    pub product_url: Option<ProductUrl>,
}

#[derive(Deserialize, Debug)]
pub struct ProductUrl {
    pub url: Option<String>,
}

// Request payloads, sent json-encoded in the `request` query parameter

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayableAssetRequest<'a> {
    pub show_id: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistPageRequest<'a> {
    pub play_list_id: &'a Value,
    pub page_number: usize,
    pub page_size: usize,
    pub sorts: [PlaylistSort; 1],
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct PlaylistSort {
    pub order: &'static str,
    #[serde(rename = "type")]
    pub sort_type: &'static str,
}

impl PlaylistSort {
    pub const NEWEST_FIRST: Self = Self {
        order: "DESC",
        sort_type: "SORTDATE",
    };
}

// Public catalogue API

#[derive(Deserialize, Debug, Default)]
pub struct MetadataResponse {
    pub data: Option<Map<String, Value>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub duration: Value,
    pub reference_date: Option<String>,
    pub genres: Option<Vec<Genre>>,
    pub show_title: Option<String>,
    pub show_name: Option<String>,
    pub season_title: Option<String>,
    #[serde(default)]
    pub season_number: Value,
    #[serde(default)]
    pub season_id: Value,
    #[serde(default)]
    pub number: Value,
}

#[derive(Deserialize, Debug)]
pub struct Genre {
    pub name: Option<String>,
}

// Account endpoints

#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub basic: &'static str,
}

#[derive(Deserialize, Debug)]
pub struct LoginResponse {
    pub user: LoginUser,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub id: Value,
    pub session_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_video_metadata_with_sparse_fields() {
        let video: VideoMetadata = serde_json::from_value(json!({
            "title": "متحف الدحيح الموسم 1 كليب 1",
            "duration": "22",
            "genres": [{"name": "كوميديا"}, {"id": 3}],
            "seasonNumber": null,
        }))
        .unwrap();

        assert_eq!(video.duration, json!("22"));
        assert!(video.description.is_none());
        assert_eq!(video.genres.unwrap().len(), 2);
        assert!(video.season_number.is_null());
        assert!(video.number.is_null());
    }

    #[test]
    fn test_playout_with_loose_drm_flag() {
        let response: PlayoutResponse = serde_json::from_value(json!({
            "playout": {"url": "https://cdn.example.com/master.m3u8", "drm": "true"}
        }))
        .unwrap();
        assert_eq!(response.playout.drm, json!("true"));

        let response: PlayoutResponse =
            serde_json::from_value(json!({"playout": {"url": null}})).unwrap();
        assert!(response.playout.drm.is_null());
    }

    #[test]
    fn test_playlist_page_request_shape() {
        let playlist_id = json!(4242);
        let request = PlaylistPageRequest {
            play_list_id: &playlist_id,
            page_number: 1,
            page_size: 30,
            sorts: [PlaylistSort::NEWEST_FIRST],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "playListId": 4242,
                "pageNumber": 1,
                "pageSize": 30,
                "sorts": [{"order": "DESC", "type": "SORTDATE"}],
            })
        );
    }
}
