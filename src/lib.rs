#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cage;
pub mod geom;

use std::fmt;

use cage::{BoundingCage, CageOptions, KeyFrameId};
use geom::{Point2, Point3};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[derive(Debug, Serialize)]
struct CellExport {
    min_index: f64,
    max_index: f64,
    left_keyframe: usize,
    right_keyframe: usize,
    vertices: Vec<[f64; 3]>,
    faces: Vec<[u32; 3]>,
}

#[derive(Debug, Serialize)]
struct KeyFrameExport {
    index: f64,
    center: [f64; 3],
    orientation: [[f64; 3]; 3],
    vertices_2d: Vec<[f64; 2]>,
}

/// Kooi rond een skelet, bedoeld voor een webrenderer.
#[wasm_bindgen]
pub struct CageEngine {
    cage: BoundingCage,
}

#[wasm_bindgen]
impl CageEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CageEngine {
        CageEngine {
            cage: BoundingCage::new(),
        }
    }

    /// Bouw de kooi opnieuw op. `flat_points` bevat x,y,z-triples en
    /// `flat_template` x,y-paren.
    #[wasm_bindgen]
    pub fn set_skeleton(
        &mut self,
        flat_points: &[f64],
        smoothing_iters: u32,
        flat_template: &[f64],
    ) -> Result<(), JsValue> {
        let points = points_from_flat(flat_points).map_err(|err| js_error(&err))?;
        let template = template_from_flat(flat_template).map_err(|err| js_error(&err))?;
        self.cage
            .set_skeleton_vertices(&points, smoothing_iters as usize, &template)
            .map_err(to_js_error)
    }

    /// Splits de cel rond `index`; geeft de positie van het nieuwe keyframe
    /// in indexvolgorde terug.
    #[wasm_bindgen]
    pub fn split(&mut self, index: f64) -> Result<usize, JsValue> {
        let id = self.cage.split(index).map_err(to_js_error)?;
        self.keyframe_position(id)
            .ok_or_else(|| js_error("nieuw keyframe ontbreekt in de kooi"))
    }

    /// Verplaats punt `i` van het keyframe op positie `keyframe_index`.
    #[wasm_bindgen]
    pub fn move_point(
        &mut self,
        keyframe_index: usize,
        i: usize,
        x: f64,
        y: f64,
        validate2d: bool,
        validate3d: bool,
    ) -> Result<(), JsValue> {
        let id = self
            .keyframe_id(keyframe_index)
            .ok_or_else(|| js_error("onbekend keyframe"))?;
        self.cage
            .move_point_2d(id, i, Point2::new(x, y), validate2d, validate3d)
            .map_err(to_js_error)
    }

    /// Hoekpunten van de kooi als platte x,y,z-lijst.
    #[wasm_bindgen]
    pub fn vertices(&self) -> Vec<f64> {
        self.cage.vertices().as_flattened().to_vec()
    }

    /// Driehoeken van de kooi als platte indexlijst.
    #[wasm_bindgen]
    pub fn faces(&self) -> Vec<u32> {
        self.cage.faces().as_flattened().to_vec()
    }

    /// Samenvatting van alle bladcellen, met hun prisma.
    #[wasm_bindgen]
    pub fn cells(&self) -> Result<JsValue, JsValue> {
        let cells: Vec<CellExport> = self
            .cage
            .cells()
            .map(|(_, cell)| CellExport {
                min_index: cell.min_index(),
                max_index: cell.max_index(),
                left_keyframe: cell.left_keyframe().slot(),
                right_keyframe: cell.right_keyframe().slot(),
                vertices: cell.mesh_vertices().to_vec(),
                faces: cell.mesh_faces().to_vec(),
            })
            .collect();
        serde_wasm_bindgen::to_value(&cells).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Keyframe op positie `keyframe_index`, voor de editor.
    #[wasm_bindgen]
    pub fn keyframe(&self, keyframe_index: usize) -> Result<JsValue, JsValue> {
        let (_, kf) = self
            .cage
            .keyframes()
            .nth(keyframe_index)
            .ok_or_else(|| js_error("onbekend keyframe"))?;
        let export = KeyFrameExport {
            index: kf.index(),
            center: kf.center().to_array(),
            orientation: kf.orientation(),
            vertices_2d: kf.vertices_2d().iter().map(|p| [p.x, p.y]).collect(),
        };
        serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
    }

    #[wasm_bindgen]
    pub fn keyframe_indices(&self) -> Vec<f64> {
        self.cage.keyframes().map(|(_, kf)| kf.index()).collect()
    }

    #[wasm_bindgen]
    pub fn min_index(&self) -> f64 {
        self.cage.min_index()
    }

    #[wasm_bindgen]
    pub fn max_index(&self) -> f64 {
        self.cage.max_index()
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.cage.clear();
    }

    /// Opties als JS-object; ontbrekende velden houden hun standaardwaarde.
    #[wasm_bindgen]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: CageOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|err| JsValue::from(JsError::new(&err.to_string())))?;
        self.cage.set_options(options);
        Ok(())
    }
}

impl Default for CageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CageEngine {
    #[must_use]
    pub fn cage(&self) -> &BoundingCage {
        &self.cage
    }

    fn keyframe_id(&self, position: usize) -> Option<KeyFrameId> {
        self.cage.keyframes().nth(position).map(|(id, _)| id)
    }

    fn keyframe_position(&self, id: KeyFrameId) -> Option<usize> {
        self.cage.keyframes().position(|(other, _)| other == id)
    }
}

fn points_from_flat(flat: &[f64]) -> Result<Vec<Point3>, String> {
    if flat.len() % 3 != 0 {
        return Err(format!("skeletbuffer heeft {} waarden, geen veelvoud van 3", flat.len()));
    }
    Ok(flat
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}

fn template_from_flat(flat: &[f64]) -> Result<Vec<Point2>, String> {
    if flat.len() % 2 != 0 {
        return Err(format!("sjabloonbuffer heeft {} waarden, geen veelvoud van 2", flat.len()));
    }
    Ok(flat.chunks_exact(2).map(|c| Point2::new(c[0], c[1])).collect())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [f64; 8] = [-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];

    #[test]
    fn flat_buffers_are_chunked() {
        let points = points_from_flat(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(points, vec![Point3::new(0.0, 1.0, 2.0), Point3::new(3.0, 4.0, 5.0)]);
        assert!(points_from_flat(&[0.0, 1.0]).is_err());
        assert_eq!(template_from_flat(&SQUARE).unwrap().len(), 4);
        assert!(template_from_flat(&[1.0]).is_err());
    }

    #[test]
    fn engine_splits_and_exports_flat_mesh() {
        let mut engine = CageEngine::new();
        let skeleton = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0];
        assert!(engine.set_skeleton(&skeleton, 0, &SQUARE).is_ok());
        assert_eq!(engine.vertices().len(), 8 * 3);
        assert_eq!(engine.faces().len(), 12 * 3);

        assert_eq!(engine.split(1.5).ok(), Some(1));
        assert_eq!(engine.split(1.0).ok(), Some(1));
        assert_eq!(engine.keyframe_indices(), vec![0.0, 1.0, 1.5, 2.0]);

        assert!(engine.move_point(2, 0, -0.6, -0.6, true, true).is_ok());
        assert!(engine.move_point(9, 0, 0.0, 0.0, true, true).is_err());
        engine.cage().check_invariants().unwrap();

        engine.clear();
        assert!(engine.vertices().is_empty());
        assert_eq!(engine.max_index(), 0.0);
    }
}
