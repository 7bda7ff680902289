use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Stable identifier assigned by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WidgetId(pub String);

/// Ids arrive as strings, but some sources send plain numbers.
impl<'de> Deserialize<'de> for WidgetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Float(f64),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Int(n) => Self(n.to_string()),
            RawId::Float(n) => Self(n.to_string()),
        })
    }
}

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Tag selecting which renderer consumes a widget's payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Metric,
    List,
    Ranking,
    Calendar,
    Chart,
    Map,
    Pyramid,
    Other(String),
}

impl WidgetKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "metric" => Self::Metric,
            "list" => Self::List,
            "ranking" => Self::Ranking,
            "calendar" => Self::Calendar,
            "chart" => Self::Chart,
            "map" => Self::Map,
            "pyramid" => Self::Pyramid,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Metric => "metric",
            Self::List => "list",
            Self::Ranking => "ranking",
            Self::Calendar => "calendar",
            Self::Chart => "chart",
            Self::Map => "map",
            Self::Pyramid => "pyramid",
            Self::Other(tag) => tag,
        }
    }
}

impl Serialize for WidgetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for WidgetKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Number of grid columns a widget occupies on the widest layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ColSpan {
    #[default]
    Span1,
    Span2,
    Span3,
    Span4,
}

impl ColSpan {
    pub const MIN: usize = 1;
    pub const MAX: usize = 4;

    /// Build from a column count, clamping into `1..=4`.
    pub fn from_count(count: i64) -> Self {
        match count.clamp(Self::MIN as i64, Self::MAX as i64) {
            1 => Self::Span1,
            2 => Self::Span2,
            3 => Self::Span3,
            _ => Self::Span4,
        }
    }

    pub fn count(self) -> usize {
        match self {
            Self::Span1 => 1,
            Self::Span2 => 2,
            Self::Span3 => 3,
            Self::Span4 => 4,
        }
    }

    /// Parse a display token such as `"lg:col-span-2 md:col-span-2 row-span-2"`.
    ///
    /// The `lg:` variant wins over a bare `col-span-N`; anything unparseable is
    /// a single column.
    pub fn parse_token(token: &str) -> Self {
        let find = |prefix: &str| {
            token.split_whitespace().find_map(|part| {
                part.strip_prefix(prefix)
                    .and_then(|n| n.parse::<i64>().ok())
            })
        };
        find("lg:col-span-")
            .or_else(|| find("col-span-"))
            .map(Self::from_count)
            .unwrap_or_default()
    }

    pub fn to_token(self) -> String {
        let n = self.count();
        format!("lg:col-span-{n} md:col-span-{}", n.min(2))
    }
}

/// Vertical size class of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum HeightClass {
    #[default]
    Compact,
    Tall,
    Extra,
}

impl HeightClass {
    pub const MAX_INDEX: usize = 2;

    pub fn from_index(index: i64) -> Self {
        match index.clamp(0, Self::MAX_INDEX as i64) {
            0 => Self::Compact,
            1 => Self::Tall,
            _ => Self::Extra,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Compact => 0,
            Self::Tall => 1,
            Self::Extra => 2,
        }
    }

    pub fn parse_token(token: &str) -> Self {
        match token.trim() {
            "h-96" => Self::Tall,
            "h-[32rem]" => Self::Extra,
            _ => Self::Compact,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Compact => "h-64",
            Self::Tall => "h-96",
            Self::Extra => "h-[32rem]",
        }
    }

    pub fn pixels(self) -> f32 {
        match self {
            Self::Compact => 256.0,
            Self::Tall => 384.0,
            Self::Extra => 512.0,
        }
    }
}

/// One data-bound card on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default, deserialize_with = "deserialize_title")]
    pub title: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_span",
        serialize_with = "serialize_span"
    )]
    pub col_span: ColSpan,
    #[serde(
        default,
        deserialize_with = "deserialize_height",
        serialize_with = "serialize_height"
    )]
    pub height: HeightClass,
}

fn default_visible() -> bool {
    true
}

fn deserialize_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_span<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ColSpan, D::Error> {
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(token.as_deref().map(ColSpan::parse_token).unwrap_or_default())
}

fn serialize_span<S: Serializer>(span: &ColSpan, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&span.to_token())
}

fn deserialize_height<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HeightClass, D::Error> {
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(token
        .as_deref()
        .map(HeightClass::parse_token)
        .unwrap_or_default())
}

fn serialize_height<S: Serializer>(height: &HeightClass, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(height.token())
}

impl Widget {
    pub fn new(id: &str, kind: WidgetKind, title: &str) -> Self {
        Self {
            id: WidgetId::new(id),
            kind,
            title: title.to_string(),
            data: Value::Object(Default::default()),
            visible: true,
            col_span: ColSpan::default(),
            height: HeightClass::default(),
        }
    }

    pub fn with_layout(mut self, col_span: ColSpan, height: HeightClass) -> Self {
        self.col_span = col_span;
        self.height = height;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}
