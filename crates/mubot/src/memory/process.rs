//! Process discovery and read-only attach.
//!
//! The locator enumerates running processes, picks the first one whose
//! executable name matches the configured target set and opens it with
//! read-only rights. Attach failures are returned to the caller; nothing here
//! retries on its own.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

#[cfg(target_os = "windows")]
use windows::Win32::Foundation::HANDLE;

/// A running process as reported by the OS process list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
}

/// Check whether an executable name matches any configured target.
///
/// Matching is case-insensitive and accepts either the exact executable name
/// or a substring of it. Blank targets never match.
pub fn matches_target(exe_name: &str, targets: &[String]) -> bool {
    let name = exe_name.to_lowercase();
    targets
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .any(|t| name == t || name.contains(&t))
}

/// Pick the first process (in enumeration order) that matches the targets.
pub fn select_target<'a>(
    processes: &'a [ProcessInfo],
    targets: &[String],
) -> Option<&'a ProcessInfo> {
    processes.iter().find(|p| matches_target(&p.name, targets))
}

/// Decode a NUL-terminated UTF-16 buffer such as `PROCESSENTRY32W::szExeFile`.
pub fn wide_to_string(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Finds and attaches to the game process.
#[derive(Debug, Clone)]
pub struct ProcessLocator {
    targets: Vec<String>,
}

impl ProcessLocator {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Find the first running process matching the target set.
    pub fn find(&self) -> Result<ProcessInfo> {
        let processes = enumerate_processes()?;
        debug!("Enumerated {} processes", processes.len());

        select_target(&processes, &self.targets)
            .cloned()
            .ok_or_else(|| Error::ProcessNotFound(self.targets.join(", ")))
    }

    /// Find the target process and open it for reading.
    pub fn attach(&self) -> Result<ProcessHandle> {
        let info = self.find()?;
        debug!("Matched process {} (PID: {})", info.name, info.pid);
        ProcessHandle::open(info.pid, &info.name)
    }
}

/// Enumerate all running processes.
#[cfg(target_os = "windows")]
pub fn enumerate_processes() -> Result<Vec<ProcessInfo>> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
        TH32CS_SNAPPROCESS,
    };

    // SAFETY: CreateToolhelp32Snapshot has no pointer arguments; the returned
    // handle is closed below.
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
        .map_err(|e| Error::ProcessNotFound(format!("process snapshot failed: {e}")))?;

    let mut entry = PROCESSENTRY32W {
        dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    let mut processes = Vec::new();
    // SAFETY: `entry` is a properly sized PROCESSENTRY32W owned by this frame.
    let mut more = unsafe { Process32FirstW(snapshot, &mut entry) }.is_ok();
    while more {
        processes.push(ProcessInfo {
            pid: entry.th32ProcessID,
            name: wide_to_string(&entry.szExeFile),
        });
        // SAFETY: same entry buffer, same snapshot handle.
        more = unsafe { Process32NextW(snapshot, &mut entry) }.is_ok();
    }

    // SAFETY: snapshot was returned by CreateToolhelp32Snapshot above.
    unsafe {
        let _ = CloseHandle(snapshot);
    }

    Ok(processes)
}

#[cfg(not(target_os = "windows"))]
pub fn enumerate_processes() -> Result<Vec<ProcessInfo>> {
    Err(Error::ProcessNotFound(
        "Process enumeration is only supported on Windows".to_string(),
    ))
}

/// Read-only handle to the attached game process.
///
/// Closed on drop. The handle is created and used on one thread only.
pub struct ProcessHandle {
    #[cfg(target_os = "windows")]
    handle: HANDLE,
    pub pid: u32,
    pub name: String,
    pub base_address: u64,
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("name", &self.name)
            .field("base_address", &format_args!("{:#x}", self.base_address))
            .finish()
    }
}

impl ProcessHandle {
    /// Open a process by PID with read-only memory access.
    #[cfg(target_os = "windows")]
    pub fn open(pid: u32, name: &str) -> Result<Self> {
        use windows::Win32::System::Threading::{
            OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_VM_READ,
        };

        // SAFETY: OpenProcess takes plain values; failure is reported via Result.
        let handle = unsafe {
            OpenProcess(
                PROCESS_VM_READ | PROCESS_QUERY_LIMITED_INFORMATION,
                false,
                pid,
            )
        }
        .map_err(|e| Error::AttachDenied {
            pid,
            message: e.to_string(),
        })?;

        let base_address = match main_module_base(pid) {
            Some(base) => base,
            None => {
                warn!(
                    "Could not resolve main module base for PID {}, module-relative offsets will not resolve",
                    pid
                );
                0
            }
        };

        info!(
            "Attached to {} (PID: {}, base: {:#x})",
            name, pid, base_address
        );

        Ok(Self {
            handle,
            pid,
            name: name.to_string(),
            base_address,
        })
    }

    #[cfg(not(target_os = "windows"))]
    pub fn open(pid: u32, _name: &str) -> Result<Self> {
        Err(Error::ProcessNotFound(format!(
            "Cannot attach to PID {pid}: process attach is only supported on Windows"
        )))
    }

    /// Whether the process is still running.
    #[cfg(target_os = "windows")]
    pub fn is_running(&self) -> bool {
        use windows::Win32::Foundation::STILL_ACTIVE;
        use windows::Win32::System::Threading::GetExitCodeProcess;

        let mut code: u32 = 0;
        // SAFETY: handle is open for PROCESS_QUERY_LIMITED_INFORMATION.
        let queried = unsafe { GetExitCodeProcess(self.handle, &mut code) }.is_ok();
        queried && code == STILL_ACTIVE.0 as u32
    }

    #[cfg(not(target_os = "windows"))]
    pub fn is_running(&self) -> bool {
        false
    }
}

#[cfg(target_os = "windows")]
fn main_module_base(pid: u32) -> Option<u64> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, TH32CS_SNAPMODULE,
        TH32CS_SNAPMODULE32,
    };

    // SAFETY: snapshot handle is closed before returning.
    let snapshot =
        unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid) }.ok()?;

    let mut entry = MODULEENTRY32W {
        dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
        ..Default::default()
    };

    // SAFETY: `entry` is a properly sized MODULEENTRY32W owned by this frame.
    // The first module of a process snapshot is the main executable.
    let base = unsafe { Module32FirstW(snapshot, &mut entry) }
        .ok()
        .map(|_| entry.modBaseAddr as u64);

    // SAFETY: snapshot was returned by CreateToolhelp32Snapshot above.
    unsafe {
        let _ = CloseHandle(snapshot);
    }

    base
}

#[cfg(target_os = "windows")]
impl Drop for ProcessHandle {
    fn drop(&mut self) {
        use windows::Win32::Foundation::CloseHandle;

        // SAFETY: handle was returned by OpenProcess and is closed exactly once.
        unsafe {
            let _ = CloseHandle(self.handle);
        }
        debug!("Detached from {} (PID: {})", self.name, self.pid);
    }
}

#[cfg(target_os = "windows")]
impl crate::memory::ReadMemory for ProcessHandle {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;

        let mut buffer = vec![0u8; size];
        if size == 0 {
            return Ok(buffer);
        }

        let mut bytes_read: usize = 0;
        // SAFETY: buffer holds exactly `size` bytes and the OS writes at most
        // `size` bytes into it.
        unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const std::ffi::c_void,
                buffer.as_mut_ptr().cast(),
                size,
                Some(&mut bytes_read as *mut usize),
            )
        }
        .map_err(|e| Error::read_failed(address, e.to_string()))?;

        if bytes_read != size {
            return Err(Error::read_failed(
                address,
                format!("partial read: {bytes_read} of {size} bytes"),
            ));
        }

        Ok(buffer)
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }

    fn is_alive(&self) -> bool {
        self.is_running()
    }
}

#[cfg(not(target_os = "windows"))]
impl crate::memory::ReadMemory for ProcessHandle {
    fn read_bytes(&self, address: u64, _size: usize) -> Result<Vec<u8>> {
        Err(Error::read_failed(
            address,
            "memory reads are only supported on Windows",
        ))
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }

    fn is_alive(&self) -> bool {
        false
    }
}
