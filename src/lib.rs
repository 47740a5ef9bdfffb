// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod interests;
pub mod ledger;
pub mod messages;
pub mod models;
pub mod notify;
pub mod proposals;
pub mod session;
pub mod sheets;
pub mod utils;
