//! # Undercloud Library
//!
//! This library composes the Heat environment for an undercloud deployment
//! and drives the installers around it. It is designed to be used by the
//! `undercloud` command-line tool, but the composition engine can be used on
//! its own by anything that needs to deploy from a private copy of a template
//! tree.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use undercloud::redirect::TemplateRedirector;
//!
//! let redirector = TemplateRedirector::new("/tmp/thtroot", "/twd/templates");
//!
//! // Paths inside the template tree move into the working copy
//! assert_eq!(
//!     redirector.redirect(Path::new("/tmp/thtroot/puppet/foo.yaml")),
//!     Path::new("/twd/templates/puppet/foo.yaml")
//! );
//!
//! // A sibling that merely shares a name prefix is left alone
//! assert_eq!(
//!     redirector.redirect(Path::new("/tmp/thtroot42/notouch.yaml")),
//!     Path::new("/tmp/thtroot42/notouch.yaml")
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Path classification (`path`)**: Lexical, component-wise test of whether
//!   a path lies under a root. Symlinks are never resolved.
//! - **Redirection (`redirect`)**: Maps template-tree paths onto the working
//!   copy. Redirecting twice is the same as redirecting once.
//! - **Registry rewriting (`registry`)**: Rewrites the `resource_registry` of
//!   an environment file in the working copy so it refers to working-copy
//!   templates.
//! - **Environment composition (`environments`)**: Assembles the ordered list
//!   of environment files: base files, feature files, the container images
//!   file, operator files, and the passwords file last.
//! - **Passwords (`passwords`)**: Merges generated, persisted and operator
//!   supplied secrets and stores them in structured and legacy form.
//! - **Collaborators (`workdir`, `orchestration`, `process`)**: The working
//!   copy, the Heat client and the subprocess seam.
//! - **Installers (`config`, `install`)**: `undercloud.conf` and the command
//!   lines of the legacy and heat-based installers.
//!
//! ## Execution Flow
//!
//! A deployment runs these steps:
//!
//! 1.  **Provision**: Copy the template tree into a fresh working directory.
//! 2.  **Compose**: Build the environment file list, redirecting and
//!     rewriting every operator file that lives in the template tree.
//! 3.  **Secrets**: Merge and persist passwords, appending the passwords file.
//! 4.  **Submit**: Hand the working-copy template and the list to Heat.
//!
//! Any error aborts the run; nothing is retried.

pub mod config;
pub mod defaults;
pub mod environments;
pub mod error;
pub mod install;
pub mod orchestration;
pub mod output;
pub mod passwords;
pub mod path;
pub mod process;
pub mod redirect;
pub mod registry;
pub mod workdir;

#[cfg(test)]
mod path_proptest;
