fn main() {
    // Only the webview shell needs the generated Tauri context.
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
