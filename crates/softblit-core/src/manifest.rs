//! Texture manifest loading from TOML.
//!
//! A manifest batch-describes the textures a scene needs:
//!
//! ```toml
//! [textures.player]
//! path = "assets/player.png"
//! columns = 4
//! rows = 2
//!
//! [textures.tileset]
//! path = "assets/tiles.png"
//! crop = [2, 0]
//! scale = [64, 64]
//! ```
//!
//! Per-entry load failures are logged and yield the sentinel id; the rest of
//! the batch continues.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use softblit_types::{Result, SoftblitError};

use crate::renderer::{Renderer, TextureId};

/// One texture entry in a manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct TextureEntry {
    pub path: String,
    /// Spritesheet columns; 0 (the default) leaves the grid disabled.
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub rows: u32,
    /// Columns/rows to crop off the right and bottom edges, applied before
    /// the grid is configured.
    #[serde(default)]
    pub crop: Option<[u32; 2]>,
    /// Final pixel size to rescale to.
    #[serde(default)]
    pub scale: Option<[u32; 2]>,
}

/// A parsed texture manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct TextureManifest {
    /// Entries keyed by the name the game layer will use. BTreeMap keeps
    /// load order (and therefore log order) deterministic.
    pub textures: BTreeMap<String, TextureEntry>,
}

impl TextureManifest {
    pub fn parse(toml_text: &str) -> Result<Self> {
        toml::from_str(toml_text).map_err(|e| SoftblitError::Manifest(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Load every entry through the facade, returning the name -> id map.
    /// Entries that fail to load map to [`TextureId::INVALID`].
    pub fn apply(&self, renderer: &mut Renderer) -> HashMap<String, TextureId> {
        let mut ids = HashMap::new();
        for (name, entry) in &self.textures {
            let id = renderer.load_texture(Path::new(&entry.path));
            if id.is_valid() {
                if let Some([right, bottom]) = entry.crop {
                    renderer.crop_texture(id, right, bottom);
                }
                renderer.set_frame_dimensions(id, entry.columns, entry.rows);
                if let Some([w, h]) = entry.scale {
                    renderer.scale_texture(id, w as f32, h as f32, true);
                }
            } else {
                log::warn!("manifest entry '{name}' failed to load, skipping");
            }
            ids.insert(name.clone(), id);
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use softblit_types::{DecodedImage, Framebuffer, ImageDecoder};

    struct StubDecoder;

    impl ImageDecoder for StubDecoder {
        fn decode(&self, path: &Path) -> Result<DecodedImage> {
            if path.extension().is_none() {
                return Err(SoftblitError::Load(format!("{}: gone", path.display())));
            }
            Ok(DecodedImage {
                width: 8,
                height: 8,
                pixels: vec![200; 8 * 8 * 4],
            })
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(Box::new(Framebuffer::new(16, 16)), Box::new(StubDecoder))
    }

    #[test]
    fn parses_full_entry() {
        let m = TextureManifest::parse(
            r#"
            [textures.player]
            path = "player.png"
            columns = 4
            rows = 2
            crop = [2, 0]
            scale = [64, 64]
            "#,
        )
        .unwrap();
        let e = &m.textures["player"];
        assert_eq!(e.path, "player.png");
        assert_eq!((e.columns, e.rows), (4, 2));
        assert_eq!(e.crop, Some([2, 0]));
        assert_eq!(e.scale, Some([64, 64]));
    }

    #[test]
    fn defaults_leave_grid_disabled() {
        let m = TextureManifest::parse(
            r#"
            [textures.bg]
            path = "bg.png"
            "#,
        )
        .unwrap();
        let e = &m.textures["bg"];
        assert_eq!((e.columns, e.rows), (0, 0));
        assert!(e.crop.is_none());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(TextureManifest::parse("this is [[[not toml").is_err());
    }

    #[test]
    fn apply_loads_and_configures() {
        let m = TextureManifest::parse(
            r#"
            [textures.sheet]
            path = "sheet.png"
            columns = 4
            rows = 2
            "#,
        )
        .unwrap();
        let mut r = renderer();
        let ids = m.apply(&mut r);
        let id = ids["sheet"];
        assert!(id.is_valid());
        let grid = *r.texture(id).unwrap().grid().unwrap();
        assert_eq!((grid.cols, grid.rows), (4, 2));
        assert_eq!((grid.cell_w, grid.cell_h), (2, 4));
    }

    #[test]
    fn apply_continues_past_failures() {
        // "broken" has no extension, so the stub decoder rejects it.
        let m = TextureManifest::parse(
            r#"
            [textures.broken]
            path = "broken"

            [textures.ok]
            path = "fine.png"
            "#,
        )
        .unwrap();
        let mut r = renderer();
        let ids = m.apply(&mut r);
        assert_eq!(ids["broken"], TextureId::INVALID);
        assert!(ids["ok"].is_valid());
        assert_eq!(r.texture_count(), 1);
    }

    #[test]
    fn load_from_file_round_trip() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[textures.a]\npath = \"a.png\"\nscale = [4, 4]").unwrap();
        let m = TextureManifest::load(f.path()).unwrap();
        assert_eq!(m.textures["a"].scale, Some([4, 4]));

        let mut r = renderer();
        let ids = m.apply(&mut r);
        let t = r.texture(ids["a"]).unwrap();
        assert_eq!((t.width(), t.height()), (4, 4));
    }
}
