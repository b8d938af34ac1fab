//! `resift-io` — reads report/dump files into [`resift_recon::Dataset`]s
//! and writes cleaned output back out. CSV/TSV and Excel only; the engine
//! itself never touches a file.

pub mod csv;
pub mod xlsx;
