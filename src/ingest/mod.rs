/// CSV ingestion for the climate correlation service.
///
/// Each submodule loads one input dataset into typed rows. Parsing is
/// split from file I/O so the format handling can be tested on in-memory
/// strings.
///
/// Submodules:
/// - `surface` — IMF annual surface temperature change (wide or long form).
/// - `ocean` — NASA land-ocean temperature index (long form, keyed by Year).

pub mod ocean;
pub mod surface;
