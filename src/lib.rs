//! Workspace-level integration tests for bitchain live in `tests/`.
