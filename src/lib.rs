//! Package resolution and installation engine for AI-assistant configuration
//! artifacts.
//!
//! The engine turns a package reference like `@acme/review-rule@2.0.0` into
//! files placed under a project root: it resolves a version against the
//! lockfile and the registry, fetches and verifies the payload, extracts it,
//! routes the result to the directory layout the target ecosystem expects
//! (Cursor, Claude Code, Windsurf, the shared `AGENTS.md` convention), and
//! records the install in `agentpm.lock`. Hook packages merge into the host
//! settings document instead of occupying a path of their own.
//!
//! Operations assume a single process per project root: lockfile and
//! settings-document updates are read-modify-write with no cross-process
//! locking.

pub mod cli;
pub mod collection;
pub mod commands;
pub mod error;
pub mod extract;
pub mod hash;
pub mod hooks;
pub mod installer;
pub mod lockfile;
pub mod package_ref;
pub mod progress;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod temp;
