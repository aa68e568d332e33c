//! ParkLens: Firestore schema extraction for the smart-parking backend.
//!
//! This library backs two small binaries: the extractor/analyzer (default
//! binary), which pulls the parking app's collections, infers a per-field
//! type inventory and renders a JSON dump plus a dbdiagram.io ERD, and the
//! `reset_spots` maintenance script, which rewrites the demo parking spots
//! back to AVAILABLE.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `dump`: JSON dump rendering.
//! - `erd`: dbdiagram.io ERD generation.
//! - `errors`: Error handling types.
//! - `extract`: Collection walk and artifact writing.
//! - `firestore`: Firestore REST client.
//! - `report`: Schema summary and statistics rendering.
//! - `reset`: Parking spot reset logic.
//! - `schema`: Field type classification and inventory.
//! - `value`: Firestore value decoding and document model.

pub mod config;
pub mod dump;
pub mod erd;
pub mod errors;
pub mod extract;
pub mod firestore;
pub mod report;
pub mod reset;
pub mod schema;
pub mod value;
