use std::sync::mpsc::Sender;
use thiserror::Error;

/// Marker message marshalled from the hook callback to the main thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRequest;

/// Error type for hook installation. Neither variant is fatal: the app keeps
/// running without the global chord and the caller logs the condition.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("global keyboard hooks are not supported on this platform")]
    Unsupported,
    #[error("failed to install keyboard hook: {0}")]
    Install(String),
}

/// Install the system-wide keyboard listener. On success the returned handle
/// keeps the hook alive; toggle requests arrive on `tx` whenever the
/// right-Shift + right-Control chord forms. The listener observes only -
/// every keystroke, tracked or not, continues down the normal OS input chain.
pub fn install(tx: Sender<ToggleRequest>) -> Result<HotkeyListener, HookError> {
    platform::install(tx)
}

pub use platform::HotkeyListener;

#[cfg(windows)]
mod platform {
    use super::{HookError, ToggleRequest};
    use crate::hotkey::chord::{ChordKey, ChordTracker};
    use once_cell::sync::OnceCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::mpsc::{self, Sender};
    use std::sync::Mutex;
    use std::thread::JoinHandle;
    use windows::Win32::Foundation::{HMODULE, HWND, LPARAM, LRESULT, WPARAM};
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::Input::KeyboardAndMouse::{VK_RCONTROL, VK_RSHIFT};
    use windows::Win32::UI::WindowsAndMessaging::{
        CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
        TranslateMessage, UnhookWindowsHookEx, HHOOK, KBDLLHOOKSTRUCT, MSG, WH_KEYBOARD_LL,
        WM_KEYDOWN, WM_KEYUP, WM_QUIT, WM_SYSKEYDOWN, WM_SYSKEYUP,
    };

    // The hook proc carries no user-data pointer, so the tracker and the
    // channel live in one process-wide cell set at install time.
    struct HookShared {
        tracker: Mutex<ChordTracker>,
        tx: Sender<ToggleRequest>,
    }

    static SHARED: OnceCell<HookShared> = OnceCell::new();

    /// Keeps the low-level hook alive; `shutdown` (or Drop) posts WM_QUIT to
    /// the hook thread and joins it so no further toggle requests can arrive.
    pub struct HotkeyListener {
        thread_id: u32,
        thread: Option<JoinHandle<()>>,
    }

    pub fn install(tx: Sender<ToggleRequest>) -> Result<HotkeyListener, HookError> {
        SHARED
            .set(HookShared {
                tracker: Mutex::new(ChordTracker::new()),
                tx,
            })
            .map_err(|_| HookError::Install("hook already installed in this process".into()))?;

        // The hook must be serviced by a thread that pumps messages, so the
        // install happens on a dedicated thread running its own loop.
        let (ready_tx, ready_rx) = mpsc::channel();
        let thread = std::thread::spawn(move || unsafe {
            let module = GetModuleHandleW(None).unwrap_or(HMODULE::default());
            let hook = match SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), module, 0)
            {
                Ok(hook) => hook,
                Err(err) => {
                    let _ = ready_tx.send(Err(err.to_string()));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(GetCurrentThreadId()));

            let mut msg = MSG::default();
            while GetMessageW(&mut msg, HWND(0), 0, 0).into() {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }

            let _ = UnhookWindowsHookEx(hook);
        });

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => Ok(HotkeyListener {
                thread_id,
                thread: Some(thread),
            }),
            Ok(Err(message)) => {
                let _ = thread.join();
                Err(HookError::Install(message))
            }
            Err(_) => Err(HookError::Install(
                "hook thread exited before signalling readiness".into(),
            )),
        }
    }

    impl HotkeyListener {
        /// Uninstall the hook and wait for the hook thread to finish
        pub fn shutdown(mut self) {
            self.stop();
        }

        fn stop(&mut self) {
            if let Some(thread) = self.thread.take() {
                unsafe {
                    let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
                }
                let _ = thread.join();
            }
        }
    }

    impl Drop for HotkeyListener {
        fn drop(&mut self) {
            self.stop();
        }
    }

    unsafe extern "system" fn keyboard_hook_proc(
        code: i32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        if code == 0 {
            // No unwind may cross the FFI boundary, and the hook must stay
            // registered no matter what the handler does.
            if catch_unwind(AssertUnwindSafe(|| handle_key_event(wparam, lparam))).is_err() {
                log::error!("keyboard hook handler panicked; event forwarded unchanged");
            }
        }
        CallNextHookEx(HHOOK(0), code, wparam, lparam)
    }

    fn handle_key_event(wparam: WPARAM, lparam: LPARAM) {
        let Some(shared) = SHARED.get() else {
            return;
        };

        let data = unsafe { *(lparam.0 as *const KBDLLHOOKSTRUCT) };
        let key = if data.vkCode == VK_RSHIFT.0 as u32 {
            ChordKey::RightShift
        } else if data.vkCode == VK_RCONTROL.0 as u32 {
            ChordKey::RightControl
        } else {
            return;
        };

        let fired = match shared.tracker.lock() {
            Ok(mut tracker) => match wparam.0 as u32 {
                WM_KEYDOWN | WM_SYSKEYDOWN => tracker.key_down(key),
                WM_KEYUP | WM_SYSKEYUP => {
                    tracker.key_up(key);
                    false
                }
                _ => false,
            },
            Err(_) => {
                log::error!("chord tracker mutex poisoned; dropping key transition");
                false
            }
        };

        if fired {
            // Fire-and-forget: the callback must return quickly and never
            // block on the main thread.
            let _ = shared.tx.send(ToggleRequest);
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use super::{HookError, ToggleRequest};
    use std::sync::mpsc::Sender;

    /// Placeholder handle; never constructed on platforms without a hook
    #[derive(Debug)]
    pub struct HotkeyListener {
        _private: (),
    }

    impl HotkeyListener {
        pub fn shutdown(self) {}
    }

    pub fn install(_tx: Sender<ToggleRequest>) -> Result<HotkeyListener, HookError> {
        Err(HookError::Unsupported)
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_install_degrades_on_unsupported_platform() {
        let (tx, _rx) = mpsc::channel();
        let err = install(tx).unwrap_err();
        assert!(matches!(err, HookError::Unsupported));
    }
}
