//! Best-effort user-facing notifications for recoverable failures.
//! Every message is also logged, so a platform without a delivery path
//! still leaves a trace.

use log::warn;

#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::Command;

/// Tell the user a storage operation failed (non-fatally)
pub fn notify_storage_error(message: &str) {
    warn!("storage notification: {message}");
    show("Perch - Storage Problem", message);
}

/// Tell the user the global hotkey could not be installed
pub fn notify_hotkey_unavailable(message: &str) {
    warn!("hotkey notification: {message}");
    show(
        "Perch - Hotkey Unavailable",
        &format!("{message}. Perch keeps running without the global shortcut."),
    );
}

/// Tell the user a second launch was refused
pub fn notify_already_running() {
    show("Perch", "Perch is already running.");
}

#[cfg(target_os = "macos")]
fn show(title: &str, body: &str) {
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        body.replace('"', "\\\""),
        title.replace('"', "\\\"")
    );

    let _ = Command::new("osascript").arg("-e").arg(&script).output();
}

#[cfg(target_os = "linux")]
fn show(title: &str, body: &str) {
    let _ = Command::new("notify-send").arg(title).arg(body).output();
}

#[cfg(windows)]
fn show(title: &str, body: &str) {
    use windows::core::HSTRING;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONINFORMATION, MB_OK};

    // MessageBoxW is modal for its own thread; run it off the main loop so
    // the hotkey and save paths never wait on a dialog.
    let title = HSTRING::from(title);
    let body = HSTRING::from(body);
    std::thread::spawn(move || unsafe {
        MessageBoxW(HWND(0), &body, &title, MB_OK | MB_ICONINFORMATION);
    });
}

#[cfg(not(any(target_os = "macos", target_os = "linux", windows)))]
fn show(_title: &str, _body: &str) {
    // Logged above; nothing else to do on this platform
}
