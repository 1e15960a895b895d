//! Manifold — a streaming manifest proxy.
//!
//! Fetches HLS playlists, DASH manifests and media segments from an
//! origin on behalf of a client, rewriting every URL reference inside
//! textual manifests so that follow-up requests route back through the
//! proxy. Binary media is streamed through untouched.

pub mod config;
pub mod error;
pub mod fetch;
pub mod rewrite;
pub mod route;
pub mod server;
