//! Privilege gate
//!
//! Repairs and auto-fix need root (POSIX) or an administrator token
//! (Windows). Any failure to determine the answer counts as not elevated.

/// Answers whether the current process may run mutating boot tools
pub trait PrivilegeGate {
    fn has_elevated_privileges(&self) -> bool;
}

impl<G: PrivilegeGate + ?Sized> PrivilegeGate for &G {
    fn has_elevated_privileges(&self) -> bool {
        (**self).has_elevated_privileges()
    }
}

/// Asks the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPrivilegeGate;

impl PrivilegeGate for SystemPrivilegeGate {
    #[cfg(unix)]
    fn has_elevated_privileges(&self) -> bool {
        nix::unistd::Uid::effective().is_root()
    }

    #[cfg(windows)]
    fn has_elevated_privileges(&self) -> bool {
        // SAFETY: IsUserAnAdmin takes no arguments and only reads the process token
        let admin = unsafe { windows_sys::Win32::UI::Shell::IsUserAnAdmin() };
        admin != 0
    }

    #[cfg(not(any(unix, windows)))]
    fn has_elevated_privileges(&self) -> bool {
        false
    }
}

/// Fixed answer, for tests and embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPrivilege(pub bool);

impl PrivilegeGate for FixedPrivilege {
    fn has_elevated_privileges(&self) -> bool {
        self.0
    }
}
