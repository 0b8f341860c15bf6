pub mod frame;
pub mod pixel;
pub mod threshold;
pub mod morphology;
pub mod smart_blob;
pub mod blob_detector;
pub mod moment;
pub mod blob_filter;
pub mod blob_matcher;
