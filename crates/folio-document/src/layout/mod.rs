// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — turning caller positions into validated PDF coordinates.

pub mod normalizer;

pub use normalizer::{Anchor, normalize_box, normalize_point, normalize_text};
