use std::time::Duration;

use zonemark_core::{AnnotationTool, CanvasSize, ImageHandle, Point};
use zonemark_io::SnapshotLoader;
use zonemark_renderer::{CanvasViewport, DisplayRect, OverlayStyle, RenderFrame, Scene};

/// Receives the confirmed geometry, by value, exactly once.
pub type CompletionCallback<O> = Box<dyn FnMut(O)>;

/// One mounted annotation tool over a camera snapshot.
///
/// Routes client-space pointer events into the tool, re-renders the overlay
/// whenever tool or backdrop state changes, hands the confirmed geometry to
/// the completion callback, and releases the snapshot when it closes. After
/// closing, every event is ignored.
pub struct AnnotationSession<T: AnnotationTool + Scene> {
    tool: T,
    viewport: CanvasViewport,
    style: OverlayStyle,
    snapshot: Option<SnapshotLoader>,
    frame: RenderFrame,
    on_complete: CompletionCallback<T::Output>,
    closed: bool,
    redraws: usize,
}

impl<T: AnnotationTool + Scene> AnnotationSession<T> {
    pub fn new(
        tool: T,
        canvas: CanvasSize,
        style: OverlayStyle,
        on_complete: impl FnMut(T::Output) + 'static,
    ) -> Self {
        let mut session = Self {
            tool,
            viewport: CanvasViewport::new(canvas),
            style,
            snapshot: None,
            frame: RenderFrame::empty(canvas),
            on_complete: Box::new(on_complete),
            closed: false,
            redraws: 0,
        };
        session.redraw();
        log::info!("Annotation session opened ({}x{})", canvas.width, canvas.height);
        session
    }

    /// Attach a snapshot loader, starting its first fetch if it has none.
    pub fn with_snapshot(mut self, mut loader: SnapshotLoader) -> Self {
        if loader.image().is_none() && !loader.is_loading() {
            loader.request();
        }
        self.snapshot = Some(loader);
        self.redraw();
        self
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Mutate the tool directly (e.g. switch zone shape) and redraw.
    pub fn update_tool<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        if self.closed {
            return None;
        }
        let out = f(&mut self.tool);
        self.redraw();
        Some(out)
    }

    pub fn viewport(&self) -> &CanvasViewport {
        &self.viewport
    }

    pub fn snapshot(&self) -> Option<&SnapshotLoader> {
        self.snapshot.as_ref()
    }

    /// The most recently rendered overlay.
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_display_rect(&mut self, display: DisplayRect) {
        self.viewport.set_display(display);
    }

    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) -> bool {
        self.route(client_x, client_y, T::pointer_down)
    }

    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> bool {
        self.route(client_x, client_y, T::pointer_move)
    }

    pub fn pointer_up(&mut self, client_x: f64, client_y: f64) -> bool {
        self.route(client_x, client_y, T::pointer_up)
    }

    fn route(&mut self, client_x: f64, client_y: f64, event: fn(&mut T, Point) -> bool) -> bool {
        if self.closed {
            return false;
        }
        let Some(p) = self.viewport.to_canvas(client_x, client_y) else {
            return false;
        };
        let changed = event(&mut self.tool, p);
        if changed {
            self.redraw();
        }
        changed
    }

    /// Confirm the tool. Returns true if a result was emitted, which
    /// closes the session.
    pub fn confirm(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let output = self.tool.confirm();
        self.finish(output)
    }

    /// Finish the tool's secondary step (entrance marking for lines).
    pub fn complete(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let output = self.tool.complete();
        self.finish(output)
    }

    fn finish(&mut self, output: Option<T::Output>) -> bool {
        match output {
            Some(result) => {
                self.redraw();
                (self.on_complete)(result);
                log::info!("Annotation confirmed");
                self.close();
                true
            }
            None => {
                // Confirm may still have moved the tool on, e.g. to entrance marking
                self.redraw();
                false
            }
        }
    }

    /// Close without emitting a result.
    pub fn cancel(&mut self) -> bool {
        if self.closed {
            return false;
        }
        log::info!("Annotation cancelled");
        self.close();
        true
    }

    pub fn reset(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let changed = self.tool.reset();
        if changed {
            self.redraw();
        }
        changed
    }

    /// Apply finished snapshot fetches. Returns true if the overlay was redrawn.
    pub fn pump(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let changed = self.snapshot.as_mut().is_some_and(|loader| loader.pump());
        if changed {
            self.redraw();
        }
        changed
    }

    /// Block until the snapshot settles, for headless hosts.
    pub fn wait_for_snapshot(&mut self, timeout: Duration) -> bool {
        if self.closed {
            return false;
        }
        let Some(loader) = self.snapshot.as_mut() else {
            return true;
        };
        let settled = loader.wait(timeout);
        self.redraw();
        settled
    }

    /// Retry after a failed or stale snapshot.
    pub fn refresh_snapshot(&mut self) -> bool {
        if self.closed {
            return false;
        }
        match self.snapshot.as_mut() {
            Some(loader) => {
                loader.refresh();
                true
            }
            None => false,
        }
    }

    fn background(&self) -> Option<ImageHandle> {
        self.snapshot.as_ref().and_then(|loader| loader.handle())
    }

    fn redraw(&mut self) {
        self.frame = self
            .tool
            .render(self.viewport.canvas, self.background(), &self.style);
        self.redraws += 1;
    }

    fn close(&mut self) {
        self.closed = true;
        if let Some(loader) = self.snapshot.as_mut() {
            loader.teardown();
        }
    }
}
