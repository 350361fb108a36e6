use crate::utils::error::{GraasError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// GRASS 圖層種類，對應 product id 的第三段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerType {
    Strds,
    Raster,
    Vector,
}

impl LayerType {
    pub fn parse(datatype: &str) -> Option<Self> {
        match datatype.to_lowercase().as_str() {
            "strds" => Some(LayerType::Strds),
            "raster" => Some(LayerType::Raster),
            "vector" => Some(LayerType::Vector),
            _ => None,
        }
    }

    /// GRaaS REST 路徑中的集合名稱
    pub fn path_segment(&self) -> &'static str {
        match self {
            LayerType::Strds => "strds",
            LayerType::Raster => "raster_layers",
            LayerType::Vector => "vector_layers",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LayerType::Strds => "Space time raster dataset",
            LayerType::Raster => "Raster dataset",
            LayerType::Vector => "Vector dataset",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerType::Strds => "strds",
            LayerType::Raster => "raster",
            LayerType::Vector => "vector",
        };
        f.write_str(name)
    }
}

/// `location.mapset.datatype.layer` 拆解後的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerComponents {
    pub location: String,
    pub mapset: String,
    pub datatype: LayerType,
    pub layer: String,
}

impl LayerComponents {
    pub fn parse(product_id: &str) -> Result<Self> {
        let invalid = |reason: &str| GraasError::InvalidProductId {
            product_id: product_id.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = product_id.split('.').collect();
        if parts.len() != 4 {
            return Err(invalid("expected location.mapset.datatype.layer"));
        }
        if parts.iter().any(|part| part.trim().is_empty()) {
            return Err(invalid("empty component"));
        }

        let datatype = LayerType::parse(parts[2])
            .ok_or_else(|| invalid("datatype must be one of strds, raster, vector"))?;

        Ok(Self {
            location: parts[0].to_string(),
            mapset: parts[1].to_string(),
            datatype,
            layer: parts[3].to_string(),
        })
    }
}

/// `t.info` / `r.info` 輸出的原始鍵值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrassRecord(pub BTreeMap<String, Value>);

impl GrassRecord {
    /// 取欄位文字值，數字會轉成字串
    pub fn text(&self, field: &str) -> Result<String> {
        match self.0.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Err(GraasError::MissingField {
                field: field.to_string(),
            }),
            Some(other) => Ok(other.to_string()),
        }
    }

    pub fn coordinate(&self, field: &str) -> Result<f64> {
        let raw = self.text(field)?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| GraasError::InvalidFieldValue {
                field: field.to_string(),
                value: raw,
            })
    }
}

impl From<BTreeMap<String, Value>> for GrassRecord {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapsetInfo {
    pub projection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialExtent {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub srs: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTime {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandDescription {
    pub band_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl BandDescription {
    pub fn new(band_id: impl Into<String>) -> Self {
        Self {
            band_id: band_id.into(),
            name: None,
            unit: None,
        }
    }
}

/// openEO `GET /data/{product_id}` 回應
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataProductInfo {
    pub product_id: String,
    pub extent: SpatialExtent,
    pub source: String,
    pub description: String,
    pub mapset: String,
    pub location: String,
    #[serde(flatten)]
    pub details: DataProductDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataProductDetails {
    Strds(StrdsDetails),
    Raster(RasterDetails),
    Vector(VectorDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrdsDetails {
    pub time: DateTime,
    pub bands: BandDescription,
    pub temporal_type: String,
    pub number_of_maps: String,
    pub min_min: String,
    pub min_max: String,
    pub max_min: String,
    pub max_max: String,
    pub ewres_max: String,
    pub ewres_min: String,
    pub nsres_max: String,
    pub nsres_min: String,
    pub map_time: String,
    pub granularity: String,
    pub aggregation_type: String,
    pub creation_time: String,
    pub modification_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterDetails {
    pub title: String,
    pub comments: String,
    pub datatype: String,
    pub cells: String,
    pub cols: String,
    pub rows: String,
    pub ewres: String,
    pub nsres: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// 在暫時資料庫執行，結果不保留
    Ephemeral,
    /// 結果寫入 product 所屬的 mapset
    Persistent,
}

/// 客戶端送出的 process graph 文件，原樣轉交 GRaaS
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProcessGraph(Value);

impl ProcessGraph {
    pub fn from_value(document: Value) -> Result<Self> {
        match document.get("process_graph") {
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(GraasError::InvalidProcessGraph {
                    message: "process_graph must be an object".to_string(),
                })
            }
            None => {
                return Err(GraasError::InvalidProcessGraph {
                    message: "missing process_graph".to_string(),
                })
            }
        }

        let graph = Self(document);
        if graph.product_ids().is_empty() {
            return Err(GraasError::InvalidProcessGraph {
                message: "process graph does not reference any product_id".to_string(),
            });
        }
        Ok(graph)
    }

    pub fn document(&self) -> &Value {
        &self.0
    }

    /// 深度優先收集所有 product_id，保持文件順序
    pub fn product_ids(&self) -> Vec<&str> {
        fn walk<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
            match value {
                Value::Object(map) => {
                    for (key, child) in map {
                        match (key.as_str(), child) {
                            ("product_id", Value::String(id)) => out.push(id.as_str()),
                            _ => walk(child, out),
                        }
                    }
                }
                Value::Array(items) => items.iter().for_each(|item| walk(item, out)),
                _ => {}
            }
        }

        let mut ids = Vec::new();
        walk(&self.0, &mut ids);
        ids
    }

    /// 第一個 product 決定 job 在哪個 location / mapset 執行
    pub fn target_layer(&self) -> Result<LayerComponents> {
        let first = self
            .product_ids()
            .into_iter()
            .next()
            .ok_or_else(|| GraasError::InvalidProcessGraph {
                message: "process graph does not reference any product_id".to_string(),
            })?;
        LayerComponents::parse(first)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Accepted,
    Running,
    Finished,
    Error,
    Terminated,
    Other(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Finished | JobStatus::Error | JobStatus::Terminated
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Accepted => "accepted",
            JobStatus::Running => "running",
            JobStatus::Finished => "finished",
            JobStatus::Error => "error",
            JobStatus::Terminated => "terminated",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "accepted" => JobStatus::Accepted,
            "running" => JobStatus::Running,
            "finished" => JobStatus::Finished,
            "error" => JobStatus::Error,
            "terminated" => JobStatus::Terminated,
            _ => JobStatus::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GRaaS resource 狀態；`job_id` 即 GRaaS 的 resource_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(alias = "resource_id")]
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_results: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
}

impl JobRecord {
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            message: None,
            process_results: None,
            urls: None,
            accept_datetime: None,
            datetime: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
