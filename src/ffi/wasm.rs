// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! WASM bindings using wasm-bindgen
//!
//! Sessions return snapshots as JSON strings for a JS renderer.

use crate::config::EngineConfig;
use crate::kernel::{TetrahedronKernel, TriangleKernel};
use nalgebra::{Point2, Point3};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {}", e)))
}

fn to_js_error(e: crate::SimplexError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn config_with_seed(seed: Option<u64>) -> EngineConfig {
    EngineConfig {
        seed,
        ..EngineConfig::default()
    }
}

#[wasm_bindgen]
pub struct WasmTriangleSession {
    inner: TriangleKernel,
}

#[wasm_bindgen]
impl WasmTriangleSession {
    #[wasm_bindgen(constructor)]
    pub fn new(scale: f64, seed: Option<u64>) -> Result<WasmTriangleSession, JsValue> {
        let config = EngineConfig {
            triangle_scale: scale,
            ..config_with_seed(seed)
        };
        let inner = TriangleKernel::new(config).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    /// Move the query point, returns the snapshot as JSON
    pub fn update(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        let snapshot = self.inner.update(Point2::new(x, y)).map_err(to_js_error)?;
        to_json(snapshot)
    }

    pub fn measure(&mut self) -> Result<String, JsValue> {
        let snapshot = self.inner.measure().map_err(to_js_error)?;
        to_json(snapshot)
    }

    /// Triangle vertices with colors and labels
    pub fn vertices(&self) -> Result<String, JsValue> {
        to_json(self.inner.triangle().vertices())
    }
}

#[wasm_bindgen]
pub struct WasmTetrahedronSession {
    inner: TetrahedronKernel,
}

#[wasm_bindgen]
impl WasmTetrahedronSession {
    #[wasm_bindgen(constructor)]
    pub fn new(edge: f64, seed: Option<u64>) -> Result<WasmTetrahedronSession, JsValue> {
        let config = EngineConfig {
            tetrahedron_edge: edge,
            ..config_with_seed(seed)
        };
        let inner = TetrahedronKernel::new(config).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    pub fn update(&mut self, x: f64, y: f64, z: f64) -> Result<String, JsValue> {
        let snapshot = self.inner.update(Point3::new(x, y, z)).map_err(to_js_error)?;
        to_json(snapshot)
    }

    /// Move slider `axis` to `value` in `[0, 1]`
    pub fn slide(&mut self, axis: usize, value: f64) -> Result<String, JsValue> {
        let snapshot = self.inner.slide(axis, value).map_err(to_js_error)?;
        to_json(snapshot)
    }

    pub fn measure(&mut self) -> Result<String, JsValue> {
        let snapshot = self.inner.measure().map_err(to_js_error)?;
        to_json(snapshot)
    }

    pub fn vertices(&self) -> Result<String, JsValue> {
        to_json(self.inner.tetrahedron().vertices())
    }
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
