//! Category-specific technical specifications.
//!
//! Every category declares the attributes it knows about; anything else the
//! catalog carries lands in an ordered `other` map so it can still be shown
//! under a generic "other specs" heading.

use crate::catalog::Category;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single spec value as found in the catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Null,
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<SpecValue>),
    Map(BTreeMap<String, SpecValue>),
}

impl SpecValue {
    /// Interpret the value as an integer, accepting numeric text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SpecValue::Number(n) => n.as_i64(),
            SpecValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Null => f.write_str("-"),
            SpecValue::Flag(true) => f.write_str("Yes"),
            SpecValue::Flag(false) => f.write_str("No"),
            SpecValue::Number(n) => write!(f, "{}", n),
            SpecValue::Text(s) => f.write_str(s),
            SpecValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                f.write_str(&parts.join(", "))
            }
            SpecValue::Map(entries) => {
                let parts: Vec<String> = entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

/// An ordered list of option tiers; index 0 is the included tier.
///
/// The catalog may give a single value (`"memory": "8GB"`) or a list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawTiers", into = "Vec<String>")]
pub struct TierList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTiers {
    Many(Vec<TierLabel>),
    One(TierLabel),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TierLabel {
    Text(String),
    Number(serde_json::Number),
}

impl From<TierLabel> for String {
    fn from(label: TierLabel) -> Self {
        match label {
            TierLabel::Text(s) => s,
            TierLabel::Number(n) => n.to_string(),
        }
    }
}

impl From<RawTiers> for TierList {
    fn from(raw: RawTiers) -> Self {
        match raw {
            RawTiers::Many(labels) => TierList(labels.into_iter().map(String::from).collect()),
            RawTiers::One(label) => TierList(vec![label.into()]),
        }
    }
}

impl From<TierList> for Vec<String> {
    fn from(tiers: TierList) -> Self {
        tiers.0
    }
}

impl TierList {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// The included tier.
    pub fn base(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Position of a label, if it is one of the tiers.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|t| t == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Attributes shared by every category: the configurable tiers and the
/// release year.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_options: Option<TierList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<TierList>,
    #[serde(
        default,
        deserialize_with = "lenient_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_year: Option<i32>,
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<SpecValue>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_i64())
        .and_then(|y| i32::try_from(y).ok()))
}

type OtherSpecs = BTreeMap<String, SpecValue>;

/// iPhone specs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneSpecs {
    #[serde(flatten)]
    pub tiers: TierSpecs,
    pub display: Option<SpecValue>,
    pub chip: Option<SpecValue>,
    pub camera_specs: Option<SpecValue>,
    pub dynamic_island: Option<SpecValue>,
    #[serde(rename = "faceID")]
    pub face_id: Option<SpecValue>,
    #[serde(rename = "AppleIntelligence")]
    pub apple_intelligence: Option<SpecValue>,
    #[serde(rename = "5G")]
    pub five_g: Option<SpecValue>,
    pub battery: Option<SpecValue>,
    pub water_resistance: Option<SpecValue>,
    #[serde(flatten)]
    pub other: OtherSpecs,
}

/// Mac specs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacSpecs {
    #[serde(flatten)]
    pub tiers: TierSpecs,
    pub display: Option<SpecValue>,
    pub chip: Option<SpecValue>,
    pub cpu_cores: Option<SpecValue>,
    pub gpu_cores: Option<SpecValue>,
    pub graphics: Option<SpecValue>,
    pub ports: Option<SpecValue>,
    pub thunderbolt: Option<SpecValue>,
    pub battery_hour: Option<SpecValue>,
    pub weight: Option<SpecValue>,
    #[serde(flatten)]
    pub other: OtherSpecs,
}

/// iPad specs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabletSpecs {
    #[serde(flatten)]
    pub tiers: TierSpecs,
    pub display: Option<SpecValue>,
    pub chip: Option<SpecValue>,
    pub pencil_support: Option<SpecValue>,
    pub keyboard_support: Option<SpecValue>,
    pub connectivity: Option<SpecValue>,
    pub battery: Option<SpecValue>,
    #[serde(flatten)]
    pub other: OtherSpecs,
}

/// Apple Watch specs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchSpecs {
    #[serde(flatten)]
    pub tiers: TierSpecs,
    pub display: Option<SpecValue>,
    pub chip: Option<SpecValue>,
    pub sensors: Option<SpecValue>,
    pub health_features: Option<SpecValue>,
    pub water_resistance: Option<SpecValue>,
    pub battery: Option<SpecValue>,
    #[serde(flatten)]
    pub other: OtherSpecs,
}

/// AirPods specs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSpecs {
    #[serde(flatten)]
    pub tiers: TierSpecs,
    pub chip: Option<SpecValue>,
    pub audio_features: Option<SpecValue>,
    pub microphones: Option<SpecValue>,
    pub battery: Option<SpecValue>,
    pub charging: Option<SpecValue>,
    pub water_resistance: Option<SpecValue>,
    #[serde(flatten)]
    pub other: OtherSpecs,
}

/// Accessory specs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorySpecs {
    #[serde(flatten)]
    pub tiers: TierSpecs,
    pub connector: Option<SpecValue>,
    pub length: Option<SpecValue>,
    pub max_power: Option<SpecValue>,
    pub material: Option<SpecValue>,
    #[serde(flatten)]
    pub other: OtherSpecs,
}

/// Specs keyed by the product's category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProductSpecs {
    IPhone(PhoneSpecs),
    Mac(MacSpecs),
    IPad(TabletSpecs),
    AppleWatch(WatchSpecs),
    AirPods(AudioSpecs),
    Accessories(AccessorySpecs),
}

/// Labelled known attributes, in display order.
type Known<'a> = Vec<(&'static str, &'a Option<SpecValue>)>;

impl ProductSpecs {
    /// Interpret a raw specs object for the given category.
    pub fn from_parts(
        category: Category,
        raw: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, serde_json::Error> {
        let value = serde_json::Value::Object(raw);
        Ok(match category {
            Category::IPhone => ProductSpecs::IPhone(serde_json::from_value(value)?),
            Category::Mac => ProductSpecs::Mac(serde_json::from_value(value)?),
            Category::IPad => ProductSpecs::IPad(serde_json::from_value(value)?),
            Category::AppleWatch => ProductSpecs::AppleWatch(serde_json::from_value(value)?),
            Category::AirPods => ProductSpecs::AirPods(serde_json::from_value(value)?),
            Category::Accessories => ProductSpecs::Accessories(serde_json::from_value(value)?),
        })
    }

    /// Empty specs for a category.
    pub fn empty(category: Category) -> Self {
        match category {
            Category::IPhone => ProductSpecs::IPhone(PhoneSpecs::default()),
            Category::Mac => ProductSpecs::Mac(MacSpecs::default()),
            Category::IPad => ProductSpecs::IPad(TabletSpecs::default()),
            Category::AppleWatch => ProductSpecs::AppleWatch(WatchSpecs::default()),
            Category::AirPods => ProductSpecs::AirPods(AudioSpecs::default()),
            Category::Accessories => ProductSpecs::Accessories(AccessorySpecs::default()),
        }
    }

    pub fn tiers(&self) -> &TierSpecs {
        match self {
            ProductSpecs::IPhone(s) => &s.tiers,
            ProductSpecs::Mac(s) => &s.tiers,
            ProductSpecs::IPad(s) => &s.tiers,
            ProductSpecs::AppleWatch(s) => &s.tiers,
            ProductSpecs::AirPods(s) => &s.tiers,
            ProductSpecs::Accessories(s) => &s.tiers,
        }
    }

    pub fn storage_options(&self) -> Option<&TierList> {
        self.tiers().storage_options.as_ref()
    }

    pub fn memory(&self) -> Option<&TierList> {
        self.tiers().memory.as_ref()
    }

    pub fn release_year(&self) -> Option<i32> {
        self.tiers().release_year
    }

    /// Attributes the category does not declare.
    pub fn other(&self) -> &BTreeMap<String, SpecValue> {
        match self {
            ProductSpecs::IPhone(s) => &s.other,
            ProductSpecs::Mac(s) => &s.other,
            ProductSpecs::IPad(s) => &s.other,
            ProductSpecs::AppleWatch(s) => &s.other,
            ProductSpecs::AirPods(s) => &s.other,
            ProductSpecs::Accessories(s) => &s.other,
        }
    }

    /// Known attributes that are present, labelled for display.
    pub fn highlights(&self) -> Vec<(&'static str, &SpecValue)> {
        let known: Known<'_> = match self {
            ProductSpecs::IPhone(s) => vec![
                ("Display", &s.display),
                ("Chip", &s.chip),
                ("Camera", &s.camera_specs),
                ("Dynamic Island", &s.dynamic_island),
                ("Face ID", &s.face_id),
                ("Apple Intelligence", &s.apple_intelligence),
                ("5G", &s.five_g),
                ("Battery", &s.battery),
                ("Water resistance", &s.water_resistance),
            ],
            ProductSpecs::Mac(s) => vec![
                ("Display", &s.display),
                ("Chip", &s.chip),
                ("CPU cores", &s.cpu_cores),
                ("GPU cores", &s.gpu_cores),
                ("Graphics", &s.graphics),
                ("Ports", &s.ports),
                ("Thunderbolt", &s.thunderbolt),
                ("Battery life", &s.battery_hour),
                ("Weight", &s.weight),
            ],
            ProductSpecs::IPad(s) => vec![
                ("Display", &s.display),
                ("Chip", &s.chip),
                ("Apple Pencil", &s.pencil_support),
                ("Keyboard", &s.keyboard_support),
                ("Connectivity", &s.connectivity),
                ("Battery", &s.battery),
            ],
            ProductSpecs::AppleWatch(s) => vec![
                ("Display", &s.display),
                ("Chip", &s.chip),
                ("Sensors", &s.sensors),
                ("Health", &s.health_features),
                ("Water resistance", &s.water_resistance),
                ("Battery", &s.battery),
            ],
            ProductSpecs::AirPods(s) => vec![
                ("Chip", &s.chip),
                ("Audio", &s.audio_features),
                ("Microphones", &s.microphones),
                ("Battery", &s.battery),
                ("Charging", &s.charging),
                ("Water resistance", &s.water_resistance),
            ],
            ProductSpecs::Accessories(s) => vec![
                ("Connector", &s.connector),
                ("Length", &s.length),
                ("Max power", &s.max_power),
                ("Material", &s.material),
            ],
        };
        known
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| (label, v)))
            .collect()
    }
}
