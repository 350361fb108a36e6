#![allow(dead_code)]

use async_trait::async_trait;
use graas_openeo::core::{ExecutionMode, GraasBackend, JobRecord, JobStatus};
use graas_openeo::domain::model::{GrassRecord, MapsetInfo, ProcessGraph};
use graas_openeo::utils::error::{GraasError, Result};
use graas_openeo::{start_server, JobPoller, OpenEoClient};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn strds_example() -> Value {
    json!({
        "aggregation_type": "None",
        "bottom": "0.0",
        "creation_time": "2016-08-11 16:44:29.756411",
        "creator": "soeren",
        "east": "75.5",
        "end_time": "2013-07-01 00:00:00",
        "ewres_max": "0.25",
        "ewres_min": "0.25",
        "granularity": "1 month",
        "id": "precipitation_1950_2013_monthly_mm@PERMANENT",
        "map_time": "interval",
        "mapset": "PERMANENT",
        "max_max": "1076.9",
        "max_min": "168.9",
        "min_max": "3.2",
        "min_min": "0.0",
        "modification_time": "2016-08-11 16:45:14.032432",
        "name": "precipitation_1950_2013_monthly_mm",
        "north": "75.5",
        "nsres_max": "0.25",
        "nsres_min": "0.25",
        "number_of_maps": "762",
        "raster_register": "raster_map_register_934719ed2b4841818386a6f9c5f11b09",
        "semantic_type": "mean",
        "south": "25.25",
        "start_time": "1950-01-01 00:00:00",
        "temporal_type": "absolute",
        "top": "0.0",
        "west": "-40.5"
    })
}

pub fn raster_example() -> Value {
    json!({
        "cells": "2025000",
        "cols": "1500",
        "comments": "\"r.proj input=\"ned03arcsec\" location=\"northcarolina_latlong\" mapset=\"\\helena\" output=\"elev_ned10m\" method=\"cubic\" resolution=10\"",
        "creator": "\"helena\"",
        "database": "/tmp/gisdbase_75bc0828",
        "datatype": "FCELL",
        "date": "\"Tue Nov  7 01:09:51 2006\"",
        "description": "\"generated by r.proj\"",
        "east": "645000",
        "ewres": "10",
        "location": "nc_spm_08",
        "map": "elevation",
        "mapset": "PERMANENT",
        "max": "156.3299",
        "min": "55.57879",
        "ncats": "255",
        "north": "228500",
        "nsres": "10",
        "rows": "1350",
        "source1": "\"\"",
        "source2": "\"\"",
        "south": "215000",
        "timestamp": "\"none\"",
        "title": "\"South-West Wake county: Elevation NED 10m\"",
        "units": "\"none\"",
        "vdatum": "\"none\"",
        "west": "630000"
    })
}

fn filter_bbox(product_ids: &[&str], left: f64, right: f64, top: f64, bottom: f64, res: f64) -> Value {
    let collections: Vec<Value> = product_ids
        .iter()
        .map(|id| json!({ "product_id": id }))
        .collect();
    json!({
        "process_id": "filter_bbox",
        "args": {
            "collections": collections,
            "left": left,
            "right": right,
            "top": top,
            "bottom": bottom,
            "ewres": res,
            "nsres": res,
            "srs": "EPSG:4326"
        }
    })
}

fn filter_daterange(inner: Value, from: &str, to: &str) -> Value {
    json!({
        "process_id": "filter_daterange",
        "args": { "collections": [inner], "from": from, "to": to }
    })
}

fn raster_exporter(inner: Value) -> Value {
    json!({ "process_id": "raster_exporter", "args": { "collections": [inner] } })
}

const S2A_B04: &str = "LL.sentinel2A_openeo_subset.strds.S2A_B04";
const S2A_B08: &str = "LL.sentinel2A_openeo_subset.strds.S2A_B08";
const ECAD_TEMPERATURE: &str = "ECAD.PERMANENT.strds.temperature_mean_1950_2013_yearly_celsius";
const ECAD_PRECIPITATION: &str = "ECAD.PERMANENT.strds.precipitation_1950_2013_yearly_mm";

fn ndvi_min_time() -> Value {
    let band = |id| {
        filter_daterange(
            filter_bbox(&[id], -5.0, -4.98, 39.12, 39.1, 0.1),
            "2017-04-12 11:17:08",
            "2017-09-04 11:18:26",
        )
    };
    json!({
        "process_id": "min_time",
        "args": {
            "collections": [{
                "process_id": "NDVI",
                "args": {
                    "collections": [band(S2A_B04), band(S2A_B08)],
                    "red": "S2A_B04",
                    "nir": "S2A_B08"
                }
            }]
        }
    })
}

fn udf_reduce_time() -> Value {
    json!({
        "process_id": "udf_reduce_time",
        "args": {
            "collections": [filter_daterange(
                filter_bbox(&[ECAD_TEMPERATURE, ECAD_PRECIPITATION], -5.0, -4.7, 39.3, 39.0, 0.1),
                "1980-01-01 00:00:00",
                "2010-01-01 00:00:00",
            )],
            "python_file_url": "https://storage.googleapis.com/datentransfer/aggr_func.py"
        }
    })
}

pub fn use_case_1_graph() -> Value {
    json!({ "process_graph": ndvi_min_time() })
}

pub fn use_case_1_graph_export() -> Value {
    json!({ "process_graph": raster_exporter(ndvi_min_time()) })
}

pub fn use_case_2_graph() -> Value {
    json!({ "process_graph": udf_reduce_time() })
}

pub fn use_case_2_graph_export() -> Value {
    json!({ "process_graph": raster_exporter(udf_reduce_time()) })
}

pub fn use_case_3_graph() -> Value {
    json!({
        "process_graph": {
            "process_id": "zonal_statistics",
            "args": {
                "collections": [filter_daterange(
                    filter_bbox(&[ECAD_TEMPERATURE, ECAD_PRECIPITATION], -5.0, -4.7, 39.3, 39.0, 0.1),
                    "1980-01-01 00:00:00",
                    "2010-01-01 00:00:00",
                )],
                "regions": "https://storage.googleapis.com/graas-geodata/rio.json"
            }
        }
    })
}

pub fn date_range_filter() -> Value {
    json!({
        "process_graph": filter_daterange(
            filter_bbox(&[S2A_B04], -5.0, -4.98, 39.12, 39.1, 0.1),
            "2017-06-21 11:12:22",
            "2017-08-20 11:12:21",
        )
    })
}

pub fn date_range_filter_long_run() -> Value {
    json!({
        "process_graph": filter_daterange(
            filter_bbox(&[S2A_B04], -5.5, -4.5, 39.5, 38.5, 0.0001),
            "2017-06-21 11:12:22",
            "2017-08-20 11:12:21",
        )
    })
}

pub fn date_range_filter_error_no_strds() -> Value {
    json!({
        "process_graph": filter_daterange(
            filter_bbox(&["LL.sentinel2A_openeo_subset.strds.S2A_B04_nope"], -5.0, -4.99, 39.0, 38.99, 0.1),
            "2017-06-21 11:12:22",
            "2017-08-20 11:12:21",
        )
    })
}

struct ScriptedJob {
    statuses: VecDeque<JobStatus>,
    message: Option<String>,
}

/// 記憶體內的 GRaaS：每次查詢狀態就往下走一步，停在最後一個狀態
#[derive(Default)]
pub struct ScriptedBackend {
    layers: HashMap<String, GrassRecord>,
    jobs: Mutex<HashMap<String, ScriptedJob>>,
    submissions: Mutex<Vec<(Vec<String>, ExecutionMode)>>,
    next_id: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, product_id: &str, record: Value) -> Self {
        let record = serde_json::from_value(record).expect("layer fixture must be an object");
        self.layers.insert(product_id.to_string(), record);
        self
    }

    pub fn submissions(&self) -> Vec<(Vec<String>, ExecutionMode)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraasBackend for ScriptedBackend {
    async fn layer_info(&self, product_id: &str) -> Result<GrassRecord> {
        self.layers
            .get(product_id)
            .cloned()
            .ok_or_else(|| GraasError::BackendError {
                status: 400,
                message: format!("Layer <{}> not found", product_id),
            })
    }

    async fn mapset_info(&self, _location: &str, mapset: &str) -> Result<MapsetInfo> {
        if mapset == "missing" {
            return Err(GraasError::BackendError {
                status: 400,
                message: "Mapset does not exist".to_string(),
            });
        }
        Ok(MapsetInfo {
            projection: "EPSG:4326".to_string(),
            region: None,
        })
    }

    async fn submit_job(&self, graph: &ProcessGraph, mode: ExecutionMode) -> Result<JobRecord> {
        let product_ids: Vec<String> = graph.product_ids().iter().map(|s| s.to_string()).collect();
        let job_id = format!("resource_id-{}", self.next_id.fetch_add(1, Ordering::SeqCst));

        let (statuses, message) = if product_ids.iter().any(|id| id.ends_with("_nope")) {
            (
                vec![JobStatus::Accepted, JobStatus::Running, JobStatus::Error],
                Some("STRDS <S2A_B04_nope> not found".to_string()),
            )
        } else {
            (
                vec![
                    JobStatus::Accepted,
                    JobStatus::Running,
                    JobStatus::Running,
                    JobStatus::Finished,
                ],
                None,
            )
        };

        self.jobs.lock().unwrap().insert(
            job_id.clone(),
            ScriptedJob {
                statuses: statuses.into(),
                message,
            },
        );
        self.submissions.lock().unwrap().push((product_ids, mode));

        Ok(JobRecord::new(job_id, JobStatus::Accepted))
    }

    async fn job_status(&self, job_id: &str) -> Result<JobRecord> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(job_id).ok_or_else(|| GraasError::BackendError {
            status: 400,
            message: format!("Resource <{}> does not exist", job_id),
        })?;

        let status = if job.statuses.len() > 1 {
            job.statuses.pop_front()
        } else {
            job.statuses.front().cloned()
        }
        .unwrap_or(JobStatus::Running);

        let mut record = JobRecord::new(job_id, status.clone());
        if status == JobStatus::Error {
            record.message = job.message.clone();
        }
        Ok(record)
    }

    async fn delete_job(&self, job_id: &str) -> Result<JobRecord> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(job_id).ok_or_else(|| GraasError::BackendError {
            status: 400,
            message: format!("Resource <{}> does not exist", job_id),
        })?;

        job.statuses = vec![JobStatus::Running, JobStatus::Terminated].into();
        let mut record = JobRecord::new(job_id, JobStatus::Running);
        record.message = Some("Resource accepted for termination".to_string());
        Ok(record)
    }
}

/// 在隨機 port 啟動服務，回傳指向它的 poller
pub async fn spawn_app(backend: Arc<dyn GraasBackend>) -> JobPoller {
    let (addr, _handle) = start_server(backend, "127.0.0.1:0".parse().unwrap())
        .await
        .expect("server should start");
    let client = OpenEoClient::new(&format!("http://{}", addr)).unwrap();
    JobPoller::new(client)
        .with_poll_interval(Duration::from_millis(20))
        .with_timeout(Duration::from_secs(10))
}
