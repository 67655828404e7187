mod basemap;
mod camera;
mod geometry;
mod markers;
mod projection;
mod renderer;

pub use basemap::{
    default_preference_path, Basemap, BasemapController, FilePreferences, PreferenceStore,
    TileSource,
};
pub use camera::{Camera, CameraCommand, FlyToController, FLY_TO_DURATION_SECS, FLY_TO_ZOOM};
pub use markers::{build_markers, hit_test, Marker};
pub use projection::Viewport;
pub use renderer::{Lod, MapRenderer, MarkerLayer, RenderedMap};
