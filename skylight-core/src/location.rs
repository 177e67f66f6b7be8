//! Static directory of recognized cities.
//!
//! Every city carries three identifiers for the same physical place:
//! the display name shown to the user, the observation-station name the
//! observation service expects, and the key into the sunrise/sunset table.

/// One recognized city. Immutable, looked up by exact display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Display name, also the key for the forecast service.
    pub city_name: &'static str,
    /// Observation-station name for the observation service.
    pub location_name: &'static str,
    /// Key into the sunrise/sunset table.
    pub sunrise_city_name: &'static str,
}

/// All cities the dashboard knows about.
pub const AVAILABLE_LOCATIONS: &[Location] = &[
    Location { city_name: "臺北市", location_name: "臺北", sunrise_city_name: "臺北" },
    Location { city_name: "新北市", location_name: "板橋", sunrise_city_name: "新北市" },
    Location { city_name: "桃園市", location_name: "新屋", sunrise_city_name: "桃園" },
    Location { city_name: "臺中市", location_name: "臺中", sunrise_city_name: "臺中" },
    Location { city_name: "臺南市", location_name: "南區中心", sunrise_city_name: "臺南" },
    Location { city_name: "高雄市", location_name: "高雄", sunrise_city_name: "高雄" },
    Location { city_name: "基隆市", location_name: "基隆", sunrise_city_name: "基隆" },
    Location { city_name: "新竹縣", location_name: "新竹", sunrise_city_name: "新竹" },
    Location { city_name: "新竹市", location_name: "新竹市東區", sunrise_city_name: "新竹市" },
    Location { city_name: "苗栗縣", location_name: "三義", sunrise_city_name: "苗栗" },
    Location { city_name: "彰化縣", location_name: "彰師大", sunrise_city_name: "彰化" },
    Location { city_name: "南投縣", location_name: "日月潭", sunrise_city_name: "南投" },
    Location { city_name: "雲林縣", location_name: "草嶺", sunrise_city_name: "雲林" },
    Location { city_name: "嘉義縣", location_name: "阿里山", sunrise_city_name: "嘉義" },
    Location { city_name: "嘉義市", location_name: "嘉義", sunrise_city_name: "嘉義" },
    Location { city_name: "屏東縣", location_name: "恆春", sunrise_city_name: "屏東" },
    Location { city_name: "宜蘭縣", location_name: "宜蘭", sunrise_city_name: "宜蘭" },
    Location { city_name: "花蓮縣", location_name: "花蓮", sunrise_city_name: "花蓮" },
    Location { city_name: "臺東縣", location_name: "臺東", sunrise_city_name: "臺東" },
    Location { city_name: "澎湖縣", location_name: "澎湖", sunrise_city_name: "澎湖" },
    Location { city_name: "金門縣", location_name: "金門", sunrise_city_name: "金門" },
    Location { city_name: "連江縣", location_name: "馬祖", sunrise_city_name: "馬祖" },
];

/// Look up a city by its display name. An unrecognized name is `None`,
/// meaning "no location selected" for the caller.
pub fn find_location(city_name: &str) -> Option<&'static Location> {
    AVAILABLE_LOCATIONS.iter().find(|l| l.city_name == city_name)
}
