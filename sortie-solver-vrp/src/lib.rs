//! Native routing engine for Sortie.
//!
//! This crate provides [`VrpEngine`], an implementation of the
//! [`RoutingEngine`](sortie_core::RoutingEngine) trait backed by the
//! `vrp-core` metaheuristics. Demand pairs become multi-jobs served pickup
//! first, mandatory nodes outside any pair become single jobs and every
//! aircraft starts and ends at the depot.
//!
//! `vrp-core` knows nothing about landing budgets, so tours that would land
//! too often between reloads get unused reload checkpoints spliced in after
//! the search. The search is bounded by the model horizon, and tours that
//! still leave a cumulative domain shed their latest jobs, which then count
//! as dropped. The final assignment always comes from
//! [`RoutingModel::evaluate_routes`](sortie_core::RoutingModel::evaluate_routes),
//! which keeps cumulative values, slack and the objective consistent with the
//! model.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod reload;
mod repair;
mod vrp;

pub use engine::{VrpEngine, VrpEngineConfig};
