//! The unified output model.
//!
//! Both extraction pipelines render into these types, so a consumer sees the
//! same JSON shape whether the input was a flat raster image or a layered
//! PSD document. Fields that a pipeline cannot fill are left empty or `null`
//! instead of being omitted.

mod batch;
mod result;
mod source;
mod text;

pub use batch::{BatchKind, BatchResult, BatchStatus};
pub use result::{
    Analysis, AnalysisStatus, ColorEntry, ColorProvenance, ColorScheme, CompositionMetrics,
    Content, ContentText, ExtractionResult, FileInfo, GroupSummary, ImageSpecs, LayerBounds,
    LayerSummary, SizeCategory, TextContent, TextExtraction, VisualElement, VisualElements,
};
pub(crate) use result::join_texts;
pub use source::SourceFile;
pub use text::{TextElement, TextStyle};
