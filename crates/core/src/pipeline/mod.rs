pub mod pipeline_logger;
pub mod zone_pipeline_use_case;
