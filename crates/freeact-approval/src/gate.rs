//! The approval gate (C4): resolving a core [`ApprovalRequest`] with a
//! permission-manager-aware [`ApprovalDecision`], and detecting a rejected
//! programmatic tool call (PTC) from kernel output text.

use freeact_core::ApprovalRequest;
use regex::Regex;
use std::sync::LazyLock;

use crate::decision::ApprovalDecision;
use crate::error::ApprovalResult;
use crate::permission::PermissionManager;

/// Matches the kernel's rejection message for a programmatic tool call
/// (§4.4 item 2). The turn engine scans completed code-execution output for
/// this pattern to decide whether the enclosing tool-return is `rejected`.
pub static PTC_REJECTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ToolRunnerError: Approval request for \S+ rejected").unwrap()
});

/// Whether `output` contains the kernel's PTC-rejection marker.
#[must_use]
pub fn is_ptc_rejection(output: &str) -> bool {
    PTC_REJECTED_RE.is_match(output)
}

/// Resolve `request` with `decision`: consumes the request's oneshot with
/// the plain `bool` the core event carries, and records the decision's
/// effect (allow-list update, optional persistence) in `permissions`.
/// Returns whether the call was approved.
pub fn resolve(
    request: ApprovalRequest,
    decision: ApprovalDecision,
    permissions: &PermissionManager,
) -> ApprovalResult<bool> {
    let tool_name = request.tool_name.clone();
    let approved = permissions.record(&tool_name, decision)?;
    request.approve(approved);
    Ok(approved)
}
