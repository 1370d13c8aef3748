//! wire entities for the heartbeat exchange
//! field names are camelCase on the wire, matching the room management server

use serde::{Deserialize, Serialize};

/// raw status strings the server is known to send
pub const RAW_STATUS_ACTIVE: &str = "ACTIVE";
pub const RAW_STATUS_PENDING: &str = "PENDING";
pub const RAW_STATUS_DISABLED: &str = "DISABLED";

/// the only recognized remote command, full client restart
pub const COMMAND_REFRESH: &str = "REFRESH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequestDto {
    pub mac_address: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponseDto {
    pub device_status: String,
    pub device_name: Option<String>,
    pub room_number: Option<String>,
    pub activity: Option<ActivityDto>,
    pub ad: Option<AdDto>,
    pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub qr_code: Option<QrCodeDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QrCodeTypeEnum {
    // literal payload to render as a qr code
    GENERATED,
    // pre-rendered image reference
    IMAGE_URL,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeDto {
    pub data: String,
    #[serde(rename = "type")]
    pub qr_type: QrCodeTypeEnum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdMediaTypeEnum {
    IMAGE,
    VIDEO,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: AdMediaTypeEnum,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoamiDto {
    pub ip: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_full_response() {
        let json = r#"{
            "deviceStatus": "ACTIVE",
            "deviceName": "Lobby Display",
            "roomNumber": "R-204",
            "activity": {
                "title": "Sprint Review",
                "startTime": "2024-05-01T09:00:00Z",
                "endTime": "2024-05-01T10:00:00Z",
                "description": "Team sync",
                "qrCode": { "data": "https://example.com/join", "type": "GENERATED" }
            },
            "ad": { "id": "ad-1", "name": "Promo", "type": "VIDEO", "url": "https://cdn/ad.mp4" },
            "command": "REFRESH"
        }"#;
        let resp: HeartbeatResponseDto = serde_json::from_str(json).unwrap();
        assert_eq!(resp.device_status, RAW_STATUS_ACTIVE);
        assert_eq!(resp.room_number.as_deref(), Some("R-204"));
        let activity = resp.activity.unwrap();
        assert_eq!(activity.title, "Sprint Review");
        assert!(activity.image_url.is_none());
        assert_eq!(activity.qr_code.unwrap().qr_type, QrCodeTypeEnum::GENERATED);
        assert_eq!(resp.ad.unwrap().media_type, AdMediaTypeEnum::VIDEO);
        assert_eq!(resp.command.as_deref(), Some(COMMAND_REFRESH));
    }

    #[test]
    fn test_decode_minimal_response() {
        let resp: HeartbeatResponseDto = serde_json::from_str(r#"{"deviceStatus": "PENDING"}"#).unwrap();
        assert_eq!(resp.device_status, RAW_STATUS_PENDING);
        assert!(resp.activity.is_none());
        assert!(resp.ad.is_none());
        assert!(resp.command.is_none());
    }

    #[test]
    fn test_encode_request_field_names() {
        let req = HeartbeatRequestDto {
            mac_address: String::from("AA:BB:CC:DD:EE:FF"),
            ip_address: String::from("192.168.1.50"),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["macAddress"], "AA:BB:CC:DD:EE:FF");
        assert_eq!(json["ipAddress"], "192.168.1.50");
    }
}
