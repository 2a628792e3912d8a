use std::io::{self, BufRead};
use std::process;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Whether stdin is an interactive console rather than a pipe or file.
pub fn stdin_is_terminal() -> bool {
    #[cfg(unix)]
    let is_tty = {
        use std::os::unix::io::AsRawFd;
        unsafe { libc::isatty(io::stdin().as_raw_fd()) == 1 }
    };

    #[cfg(windows)]
    let is_tty = {
        use std::os::windows::io::AsRawHandle;
        let handle = io::stdin().as_raw_handle();
        let mut mode: u32 = 0;
        // GetConsoleMode returns 0 if the handle is not a console
        unsafe {
            #[link(name = "kernel32")]
            extern "system" {
                fn GetConsoleMode(hConsoleHandle: *mut std::ffi::c_void, lpMode: *mut u32) -> i32;
            }
            GetConsoleMode(handle as *mut std::ffi::c_void, &mut mode) != 0
        }
    };

    #[cfg(not(any(unix, windows)))]
    let is_tty = true;

    is_tty
}

/// Ctrl+C state shared with the handler thread.
#[derive(Debug, Clone)]
pub struct Interrupt {
    running: Arc<AtomicBool>,
    waiting: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Interrupt {
            running: Arc::new(AtomicBool::new(true)),
            waiting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Install the process-wide Ctrl+C handler. The first Ctrl+C stops the
    /// run after the current group size; one while waiting for Enter exits.
    pub fn install() -> Self {
        let interrupt = Interrupt::new();
        let handler = interrupt.clone();

        ctrlc::set_handler(move || {
            if handler.waiting.load(Ordering::SeqCst) {
                process::exit(0);
            }
            eprintln!("\n\nCtrl+C pressed. Stopping after the current group size...");
            handler.stop();
        })
        .expect("Error setting Ctrl-C handler");

        interrupt
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Keeps a double-clicked console window open until the user is done.
    pub fn wait_for_enter(&self, message: &str) {
        println!("{}", message);
        self.waiting.store(true, Ordering::SeqCst);
        let mut line = String::new();
        // EOF or a read error just means there is nobody to wait for.
        let _ = io::stdin().lock().read_line(&mut line);
        self.waiting.store(false, Ordering::SeqCst);
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}
