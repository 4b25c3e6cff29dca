use super::*;
use std::sync::Arc;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn format_line_marks_level() {
    assert_eq!(format_line(&Notification::success("Login successful!")), "ok: Login successful!");
    assert_eq!(format_line(&Notification::error("Invalid credentials")), "error: Invalid credentials");
    assert_eq!(format_line(&Notification::info("No websites yet")), "info: No websites yet");
}

#[test]
fn format_line_prefixes_key() {
    assert_eq!(format_line(&Notification::loading("export", "Preparing export")), "[export] ...: Preparing export");
    assert_eq!(
        format_line(&Notification::success("Website exported").keyed("export")),
        "[export] ok: Website exported"
    );
}

#[test]
fn notifier_writes_one_line_each() {
    let buf = SharedBuf::default();
    let notifier = ConsoleNotifier::new(Box::new(buf.clone()));
    notifier.notify(Notification::loading("deploy", "Deploying"));
    notifier.notify(Notification::error("Deployment failed").keyed("deploy"));

    let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    assert_eq!(written, "[deploy] ...: Deploying\n[deploy] error: Deployment failed\n");
}
