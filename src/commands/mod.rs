// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod transactions;
pub mod salaries;
pub mod income;
pub mod reports;
pub mod exporter;
pub mod config;
pub mod doctor;
