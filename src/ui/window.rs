//! Game window
//!
//! A fixed-size top-level window whose client area is the rendered canvas.
//! The window procedure forwards clicks to the controller, repaints from a
//! timer while a twirl runs, and routes both the exit button and the close
//! gesture through the controller's exit path before destroying itself.

use std::ffi::c_void;
use std::path::PathBuf;
use std::time::Instant;

use tiny_skia::Pixmap;
use tracing::{debug, info, warn};
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BeginPaint, DIB_RGB_COLORS, EndPaint, HDC,
    InvalidateRect, PAINTSTRUCT, SetDIBitsToDevice,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, CreateWindowExW, DefWindowProcW,
    DestroyWindow, DispatchMessageW, GWLP_USERDATA, GetMessageW, GetWindowLongPtrW, IDC_ARROW,
    KillTimer, LoadCursorW, MSG, PostQuitMessage, RegisterClassW, SW_SHOW, SetTimer,
    SetWindowLongPtrW, ShowWindow, TranslateMessage, WINDOW_EX_STYLE, WM_CLOSE, WM_CREATE,
    WM_DESTROY, WM_ERASEBKGND, WM_LBUTTONDOWN, WM_PAINT, WM_TIMER, WNDCLASSW, WS_CAPTION,
    WS_MINIMIZEBOX, WS_OVERLAPPED, WS_SYSMENU,
};
use windows::core::{PCWSTR, w};

use crate::app::controller::GameController;
use crate::app::state::{GameEvent, Transition};
use crate::domain::core::Rect;
use crate::platform::windows::{point_from_lparam, window_size_for_client};
use crate::ui::animation::TwirlFrame;
use crate::ui::renderer::{
    ButtonId, CANVAS_HEIGHT, CANVAS_WIDTH, SceneLayout, SceneRenderer, pixmap_to_bgra,
};

const CLASS_NAME: PCWSTR = w!("CountingGameWindow");
const TWIRL_TIMER_ID: usize = 1;
/// Repaint interval while a twirl runs, roughly 60 frames per second
const FRAME_INTERVAL_MS: u32 = 16;

/// Window management errors
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Failed to get module handle: {0}")]
    ModuleHandle(windows::core::Error),

    #[error("Failed to register game window class")]
    ClassRegistrationFailed,

    #[error("Failed to compute window size: {0}")]
    Sizing(windows::core::Error),

    #[error("Failed to create game window")]
    WindowCreationFailed,
}

/// What the window does after the controller handled a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickOutcome {
    Redraw,
    Close,
    Nothing,
}

/// Everything the window procedure needs, owned through GWLP_USERDATA
struct WindowState {
    controller: GameController,
    renderer: SceneRenderer,
    layout: SceneLayout,
    timer_running: bool,
}

impl WindowState {
    fn new(controller: GameController, renderer: SceneRenderer) -> Self {
        let layout = SceneLayout::from_presentation(controller.presentation(), renderer.text());
        let mut state = Self {
            controller,
            renderer,
            layout,
            timer_running: false,
        };
        state.sync_scene();
        state
    }

    /// Pulls the controller's current presentation into the renderer and layout
    fn sync_scene(&mut self) {
        let image = self.controller.number_image().map(PathBuf::as_path);
        self.renderer.set_number_image(image);
        self.layout =
            SceneLayout::from_presentation(self.controller.presentation(), self.renderer.text());
    }

    fn handle_click(&mut self, x: i32, y: i32) -> ClickOutcome {
        let Some(button) = self.layout.hit_test(x, y) else {
            return ClickOutcome::Nothing;
        };
        debug!(?button, x, y, "Button clicked");

        let transition = match button {
            ButtonId::Primary => self.controller.handle_primary(),
            ButtonId::Exit => self.controller.dispatch(GameEvent::Exit),
        };

        match transition {
            Transition::Entered(_) => {
                self.sync_scene();
                ClickOutcome::Redraw
            }
            Transition::Ignored(_) => ClickOutcome::Nothing,
            Transition::Exit => ClickOutcome::Close,
        }
    }

    fn twirl_frame(&self, now: Instant) -> TwirlFrame {
        self.controller
            .twirl()
            .filter(|twirl| !twirl.is_finished(now))
            .map(|twirl| twirl.sample(now))
            .unwrap_or(TwirlFrame::REST)
    }

    fn is_animating(&self, now: Instant) -> bool {
        self.controller
            .twirl()
            .is_some_and(|twirl| !twirl.is_finished(now))
    }

    fn start_timer(&mut self, hwnd: HWND) {
        if !self.timer_running {
            unsafe { SetTimer(hwnd, TWIRL_TIMER_ID, FRAME_INTERVAL_MS, None) };
            self.timer_running = true;
        }
    }

    fn stop_timer(&mut self, hwnd: HWND) {
        if self.timer_running {
            unsafe {
                let _ = KillTimer(hwnd, TWIRL_TIMER_ID);
            }
            self.timer_running = false;
        }
    }

    fn paint(&self, hwnd: HWND) {
        let mut ps = PAINTSTRUCT::default();
        unsafe {
            let hdc = BeginPaint(hwnd, &mut ps);
            match self.renderer.render(&self.layout, self.twirl_frame(Instant::now())) {
                Ok(pixmap) => blit(hdc, &pixmap),
                Err(e) => warn!("Frame render failed: {e}"),
            }
            let _ = EndPaint(hwnd, &ps);
        }
    }
}

/// Copies a rendered pixmap onto the device context at the origin
fn blit(hdc: HDC, pixmap: &Pixmap) {
    let bgra = pixmap_to_bgra(pixmap);
    let width = pixmap.width();
    let height = pixmap.height();

    let mut info = BITMAPINFO::default();
    info.bmiHeader = BITMAPINFOHEADER {
        biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
        biWidth: width as i32,
        biHeight: -(height as i32), // Negative height: rows run top-down
        biPlanes: 1,
        biBitCount: 32,
        biCompression: BI_RGB.0,
        ..Default::default()
    };

    unsafe {
        SetDIBitsToDevice(
            hdc,
            0,
            0,
            width,
            height,
            0,
            0,
            0,
            height,
            bgra.as_ptr() as *const c_void,
            &info,
            DIB_RGB_COLORS,
        );
    }
}

unsafe fn window_state_mut(hwnd: HWND) -> Option<&'static mut WindowState> {
    let ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *mut WindowState;
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { &mut *ptr })
    }
}

unsafe extern "system" fn game_window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_CREATE => {
            unsafe {
                let createstruct = &*(lparam.0 as *const CREATESTRUCTW);
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, createstruct.lpCreateParams as isize);
                if let Some(state) = window_state_mut(hwnd) {
                    if state.is_animating(Instant::now()) {
                        state.start_timer(hwnd);
                    }
                }
            }
            LRESULT(0)
        }
        WM_ERASEBKGND => LRESULT(1), // The canvas covers the whole client area
        WM_PAINT => {
            match unsafe { window_state_mut(hwnd) } {
                Some(state) => {
                    state.paint(hwnd);
                    LRESULT(0)
                }
                None => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
            }
        }
        WM_LBUTTONDOWN => {
            let (x, y) = point_from_lparam(lparam);
            let outcome = match unsafe { window_state_mut(hwnd) } {
                Some(state) => {
                    let outcome = state.handle_click(x, y);
                    if outcome == ClickOutcome::Redraw && state.is_animating(Instant::now()) {
                        state.start_timer(hwnd);
                    }
                    outcome
                }
                None => ClickOutcome::Nothing,
            };

            // The state borrow has ended before the window can be torn down
            unsafe {
                match outcome {
                    ClickOutcome::Redraw => {
                        let _ = InvalidateRect(hwnd, None, false);
                    }
                    ClickOutcome::Close => {
                        let _ = DestroyWindow(hwnd);
                    }
                    ClickOutcome::Nothing => {}
                }
            }
            LRESULT(0)
        }
        WM_TIMER if wparam.0 == TWIRL_TIMER_ID => {
            if let Some(state) = unsafe { window_state_mut(hwnd) } {
                if !state.is_animating(Instant::now()) {
                    state.stop_timer(hwnd);
                }
            }
            // One more paint after the timer stops settles the image at rest
            unsafe {
                let _ = InvalidateRect(hwnd, None, false);
            }
            LRESULT(0)
        }
        WM_CLOSE => {
            if let Some(state) = unsafe { window_state_mut(hwnd) } {
                state.controller.exit();
            }
            unsafe {
                let _ = DestroyWindow(hwnd);
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            unsafe {
                if let Some(state) = window_state_mut(hwnd) {
                    state.stop_timer(hwnd);
                }
                // The state is reclaimed by `run` once the message loop ends
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
                PostQuitMessage(0);
            }
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

fn register_window_class(instance: HINSTANCE) -> Result<(), WindowError> {
    unsafe {
        let wnd_class = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(game_window_proc),
            hInstance: instance,
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };

        if RegisterClassW(&wnd_class) == 0 {
            return Err(WindowError::ClassRegistrationFailed);
        }
    }
    Ok(())
}

/// Opens the game window and runs the message loop until it closes
///
/// The controller and renderer are dropped when this returns, which stops
/// any sound that is still playing.
pub fn run(controller: GameController, renderer: SceneRenderer, title: &str) -> Result<(), WindowError> {
    let module = unsafe { GetModuleHandleW(PCWSTR::null()) }.map_err(WindowError::ModuleHandle)?;
    let instance: HINSTANCE = module.into();
    register_window_class(instance)?;

    // Fixed size: no thick frame and no maximize box
    let style = WS_OVERLAPPED | WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX;
    let client = Rect::new(0, 0, CANVAS_WIDTH, CANVAS_HEIGHT);
    let (width, height) = window_size_for_client(&client, style).map_err(WindowError::Sizing)?;

    let title_wide: Vec<u16> = title.encode_utf16().chain(std::iter::once(0)).collect();
    let state_ptr = Box::into_raw(Box::new(WindowState::new(controller, renderer)));

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            PCWSTR(title_wide.as_ptr()),
            style,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            width,
            height,
            None,
            None,
            instance,
            Some(state_ptr as *const c_void),
        )
    };

    if hwnd.0 == 0 {
        drop(unsafe { Box::from_raw(state_ptr) });
        return Err(WindowError::WindowCreationFailed);
    }

    info!(width = CANVAS_WIDTH, height = CANVAS_HEIGHT, "Game window created");
    unsafe {
        ShowWindow(hwnd, SW_SHOW);
    }

    let mut msg = MSG::default();
    loop {
        let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        if result.0 == 0 {
            break; // WM_QUIT
        }
        if result.0 == -1 {
            warn!("Message loop error, closing");
            unsafe {
                let _ = DestroyWindow(hwnd);
            }
            break;
        }
        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    // Dropping the state releases any audio the controller still holds
    drop(unsafe { Box::from_raw(state_ptr) });
    info!("Game window closed");
    Ok(())
}
