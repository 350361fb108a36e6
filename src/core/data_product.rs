use crate::domain::model::{
    BandDescription, DataProductDetails, DataProductInfo, DateTime, GrassRecord, LayerComponents,
    LayerType, RasterDetails, SpatialExtent, StrdsDetails, VectorDetails,
};
use crate::domain::ports::GraasBackend;
use crate::utils::error::{GraasError, Result};
use std::sync::Arc;

/// `GET /data/{product_id}`：把 GRASS metadata 轉成 openEO 格式
#[derive(Clone)]
pub struct DataProductService {
    backend: Arc<dyn GraasBackend>,
}

impl DataProductService {
    pub fn new(backend: Arc<dyn GraasBackend>) -> Self {
        Self { backend }
    }

    pub async fn get(&self, product_id: &str) -> Result<DataProductInfo> {
        let layer = self.backend.layer_def_to_components(product_id)?;

        let record = self.backend.layer_info(product_id).await.map_err(|e| {
            tracing::warn!("❌ Layer info for {} failed: {}", product_id, e);
            GraasError::RequestFailed {
                description: format!(
                    "An internal error occurred while catching GRASS GIS layer information \
                     for layer <{}>!\n Error: {}",
                    product_id, e
                ),
            }
        })?;

        // 投影資訊來自 mapset
        let mapset_info = self
            .backend
            .mapset_info(&layer.location, &layer.mapset)
            .await
            .map_err(|e| {
                tracing::warn!("❌ Mapset info for {} failed: {}", layer.mapset, e);
                GraasError::RequestFailed {
                    description: format!(
                        "An internal error occurred while catching mapset info for mapset <{}>!",
                        layer.mapset
                    ),
                }
            })?;

        tracing::debug!("GRASS layer info for {}: {:?}", product_id, record);

        build_data_product(product_id, &layer, &record, &mapset_info.projection)
    }
}

pub fn build_data_product(
    product_id: &str,
    layer: &LayerComponents,
    record: &GrassRecord,
    srs: &str,
) -> Result<DataProductInfo> {
    let extent = SpatialExtent {
        left: record.coordinate("west")?,
        right: record.coordinate("east")?,
        top: record.coordinate("north")?,
        bottom: record.coordinate("south")?,
        srs: srs.to_string(),
    };

    let details = match layer.datatype {
        LayerType::Strds => DataProductDetails::Strds(StrdsDetails {
            time: DateTime {
                from: record.text("start_time")?,
                to: record.text("end_time")?,
            },
            bands: BandDescription::new(product_id),
            temporal_type: record.text("temporal_type")?,
            number_of_maps: record.text("number_of_maps")?,
            min_min: record.text("min_min")?,
            min_max: record.text("min_max")?,
            max_min: record.text("max_min")?,
            max_max: record.text("max_max")?,
            ewres_max: record.text("ewres_max")?,
            ewres_min: record.text("ewres_min")?,
            nsres_max: record.text("nsres_max")?,
            nsres_min: record.text("nsres_min")?,
            map_time: record.text("map_time")?,
            granularity: record.text("granularity")?,
            aggregation_type: record.text("aggregation_type")?,
            creation_time: record.text("creation_time")?,
            modification_time: record.text("modification_time")?,
        }),
        LayerType::Raster => DataProductDetails::Raster(RasterDetails {
            title: record.text("title")?,
            comments: record.text("comments")?,
            datatype: record.text("datatype")?,
            cells: record.text("cells")?,
            cols: record.text("cols")?,
            rows: record.text("rows")?,
            ewres: record.text("ewres")?,
            nsres: record.text("nsres")?,
        }),
        LayerType::Vector => DataProductDetails::Vector(VectorDetails {
            title: record.text("title").ok(),
            comments: record.text("comments").ok(),
        }),
    };

    Ok(DataProductInfo {
        product_id: product_id.to_string(),
        extent,
        source: format!(
            "GRASS GIS location/mapset path: /{}/{}",
            layer.location, layer.mapset
        ),
        description: layer.datatype.description().to_string(),
        mapset: layer.mapset.clone(),
        location: layer.location.clone(),
        details,
    })
}
