mod analysis_pipeline;
mod historical_properties;
mod pricing_properties;
