// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! FFI bindings for WASM

#[cfg(feature = "wasm")]
pub mod wasm;
