//! Quill: an interactive front end for a small expression language.
//!
//! The crate is split into a terminal-independent core and thin adapters:
//!
//! - [`session`] holds the editor state machine (input line, history,
//!   reverse search, completion) as a pure `update(msg) -> (session, effects)`
//!   function plus a render tree.
//! - [`eval`] runs programs on a background thread with cancellation and a
//!   stdin relay.
//! - [`runtime`] is the boundary the session talks to; [`lang`] is the bundled
//!   implementation of it.
//! - [`tui`] paints views with crossterm and [`app`] wires everything into the
//!   binary's modes.
//!
//! # Quick start
//!
//! ```no_run
//! use quill::lang::Interpreter;
//! use quill::runtime::{pipe, Runtime};
//!
//! let (_stdin, reader) = pipe();
//! let interp = Interpreter::new(reader);
//! let result = interp.run("x = 20; x + 22");
//! assert_eq!(result.output.printed(), "42");
//! ```

pub mod app;
pub mod build_info;
pub mod config;
pub mod error;
pub mod eval;
pub mod lang;
pub mod runtime;
pub mod session;
#[cfg(test)]
pub mod testsupport;
pub mod textutil;
pub mod tui;
