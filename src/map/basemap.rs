use log::warn;
use std::fs;
use std::path::PathBuf;

/// Background tile imagery style shown under the report markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basemap {
    Satellite,
    Street,
    Dark,
}

/// Tile-source configuration handed to the map rendering layer; opaque
/// to the controller itself
pub struct TileSource {
    pub url: &'static str,
    pub attribution: &'static str,
}

impl Basemap {
    /// Stable tag used as the persisted preference value
    pub const fn tag(self) -> &'static str {
        match self {
            Basemap::Satellite => "satellite",
            Basemap::Street => "street",
            Basemap::Dark => "dark",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "satellite" => Some(Basemap::Satellite),
            "street" => Some(Basemap::Street),
            "dark" => Some(Basemap::Dark),
            _ => None,
        }
    }

    /// Toggle cycle: satellite → street → dark → satellite
    pub const fn next(self) -> Self {
        match self {
            Basemap::Satellite => Basemap::Street,
            Basemap::Street => Basemap::Dark,
            Basemap::Dark => Basemap::Satellite,
        }
    }

    pub const fn tile_source(self) -> TileSource {
        match self {
            Basemap::Satellite => TileSource {
                url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                attribution: "Tiles © Esri",
            },
            Basemap::Street => TileSource {
                url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: "© OpenStreetMap contributors",
            },
            Basemap::Dark => TileSource {
                url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
                attribution: "© OpenStreetMap contributors © CARTO",
            },
        }
    }
}

/// Durable storage for the basemap preference. Injected so the
/// controller never touches ambient global state directly.
pub trait PreferenceStore {
    fn load(&self) -> Option<String>;
    fn save(&mut self, value: &str);
}

/// File-backed store under the user's config directory
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Default preference file location
pub fn default_preference_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("disaster-watch")
        .join("basemap")
}

impl PreferenceStore for FilePreferences {
    fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn save(&mut self, value: &str) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(err) = fs::write(&self.path, value) {
            // A failed write only costs the preference surviving restart
            warn!("failed to persist basemap preference: {err}");
        }
    }
}

/// Owns the current basemap selection. Restores the persisted choice at
/// startup (invalid or absent values fall back to satellite) and
/// persists every toggle.
pub struct BasemapController {
    current: Basemap,
    store: Box<dyn PreferenceStore>,
}

impl BasemapController {
    pub fn restore(store: Box<dyn PreferenceStore>) -> Self {
        let current = store
            .load()
            .as_deref()
            .and_then(Basemap::from_tag)
            .unwrap_or(Basemap::Satellite);
        Self { current, store }
    }

    pub fn current(&self) -> Basemap {
        self.current
    }

    /// Advance the cycle and persist the new choice
    pub fn toggle(&mut self) -> Basemap {
        self.current = self.current.next();
        self.store.save(self.current.tag());
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct MemoryStore {
        value: Rc<RefCell<Option<String>>>,
    }

    impl PreferenceStore for MemoryStore {
        fn load(&self) -> Option<String> {
            self.value.borrow().clone()
        }

        fn save(&mut self, value: &str) {
            *self.value.borrow_mut() = Some(value.to_string());
        }
    }

    fn memory(initial: Option<&str>) -> (Rc<RefCell<Option<String>>>, Box<MemoryStore>) {
        let value = Rc::new(RefCell::new(initial.map(String::from)));
        let store = Box::new(MemoryStore {
            value: Rc::clone(&value),
        });
        (value, store)
    }

    #[test]
    fn test_defaults_to_satellite_without_stored_value() {
        let (_, store) = memory(None);
        assert_eq!(BasemapController::restore(store).current(), Basemap::Satellite);
    }

    #[test]
    fn test_invalid_stored_value_falls_back() {
        let (_, store) = memory(Some("moon"));
        assert_eq!(BasemapController::restore(store).current(), Basemap::Satellite);
    }

    #[test]
    fn test_valid_stored_value_restores() {
        let (_, store) = memory(Some("dark"));
        assert_eq!(BasemapController::restore(store).current(), Basemap::Dark);
    }

    #[test]
    fn test_toggle_cycles_back_after_three() {
        let (_, store) = memory(None);
        let mut controller = BasemapController::restore(store);
        assert_eq!(controller.toggle(), Basemap::Street);
        assert_eq!(controller.toggle(), Basemap::Dark);
        assert_eq!(controller.toggle(), Basemap::Satellite);
    }

    #[test]
    fn test_every_toggle_persists() {
        let (value, store) = memory(None);
        let mut controller = BasemapController::restore(store);
        controller.toggle();
        assert_eq!(value.borrow().as_deref(), Some("street"));
        controller.toggle();
        assert_eq!(value.borrow().as_deref(), Some("dark"));
    }

    #[test]
    fn test_tag_roundtrip() {
        for basemap in [Basemap::Satellite, Basemap::Street, Basemap::Dark] {
            assert_eq!(Basemap::from_tag(basemap.tag()), Some(basemap));
        }
    }
}
