/// Router Module Index
///
/// Organizes the application's routing logic into access-segregated modules.
/// Access control is applied explicitly per module: the authenticated group is
/// gated by the auth middleware layer, and the admin group's handlers resolve
/// `AuthUser` themselves and check the ADMIN role before doing any work.

/// Routes accessible to anonymous clients: health probe and login.
pub mod public;

/// Read-only place routes, available to any authenticated user.
pub mod authenticated;

/// Mutating routes restricted to users with the ADMIN role.
pub mod admin;
