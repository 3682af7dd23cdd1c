//! The renderer facade: textures, vertex staging, command replay and frame pacing.

use std::mem::ManuallyDrop;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::arena::VertexArena;
use crate::config::RendererConfig;
use crate::coords::{FColor, Rect, Vec2};
use crate::device::{nv097, Device, MemoryBlock, PushEncoder};
use crate::error::{RenderError, Result};
use crate::format::{convert_pixels, surface_format, PixelFormat, SUPPORTED_TEXTURE_FORMATS};
use crate::render::{
    bind_surface, idle_barrier, init_state, stage_colored, stage_points, stage_textured, sync_scissor, target_size,
    BlendMode, GeometryInput, Interpreter, RenderState, Step, SurfaceBinding,
};
use crate::scene::{CommandList, DrawCall, GeometryCall};
use crate::texture::{Texture, TextureAccess, TextureId, TextureInfo, TextureLayout, TextureLock, TextureStore};
use crate::time::FrameStats;

/// Hands out at most one live [`Renderer`] at a time.
///
/// The device owns a single push buffer and a single set of surface
/// registers, so two renderers would silently corrupt each other. Clones
/// share the claim.
#[derive(Debug, Clone, Default)]
pub struct RendererSlot {
    claimed: Arc<AtomicBool>,
}

impl RendererSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Builds a renderer on `device`.
    ///
    /// Fails with [`RenderError::AlreadyCreated`] while another renderer from
    /// this slot is alive, and with [`RenderError::OutOfMemory`] when the
    /// vertex arena cannot be allocated. The slot is released when the
    /// renderer is dropped or destroyed.
    pub fn create<D: Device>(&self, device: D, config: RendererConfig) -> Result<Renderer<D>> {
        if self
            .claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RenderError::AlreadyCreated);
        }
        let claim = SlotClaim {
            claimed: Arc::clone(&self.claimed),
        };
        Renderer::new(device, config, claim)
    }
}

#[derive(Debug)]
struct SlotClaim {
    claimed: Arc<AtomicBool>,
}

impl Drop for SlotClaim {
    fn drop(&mut self) {
        self.claimed.store(false, Ordering::Release);
    }
}

/// Pixels read back from a surface, rows `pitch` bytes apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    pub width: u32,
    pub height: u32,
    pub pitch: usize,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

/// Push-buffer renderer for one device.
///
/// Draws are staged into the vertex arena by the `queue_*` methods, which
/// return the calls to record into a [`CommandList`]; [`Renderer::run_command_queue`]
/// then replays the list, emitting only state that changed.
///
/// Dropping the renderer waits for the GPU and frees every native block it
/// holds; [`Renderer::destroy`] does the same and hands the device back.
pub struct Renderer<D: Device> {
    device: ManuallyDrop<D>,
    config: RendererConfig,
    arena: VertexArena,
    arena_block: ManuallyDrop<MemoryBlock>,
    textures: TextureStore,
    state: RenderState,
    stats: FrameStats,
    /// Set once `destroy` has freed everything and taken the device.
    released: bool,
    _claim: SlotClaim,
}

impl<D: Device> Renderer<D> {
    fn new(mut device: D, config: RendererConfig, claim: SlotClaim) -> Result<Self> {
        let mode = device.video_mode();
        device.set_color_format(mode.surface_format());

        let arena = VertexArena::new(config.vertex_buffer_size);
        let arena_block = match arena.capacity() {
            0 => None,
            capacity => device.alloc_contiguous(capacity),
        }
        .ok_or(RenderError::OutOfMemory {
            requested: config.vertex_buffer_size,
        })?;

        let mut enc = PushEncoder::new();
        init_state(&mut enc, mode.bounds());
        device.submit(enc.words());
        while device.is_busy() {
            std::thread::yield_now();
        }
        device.reset();

        log::info!(
            "renderer ready: {}x{} at {} bpp, {} byte vertex arena at {:#010x}",
            mode.width,
            mode.height,
            mode.bpp,
            arena.capacity(),
            arena_block.physical_address()
        );

        let mut stats = FrameStats::new();
        if config.show_fps {
            stats.begin_frame();
        }

        Ok(Self {
            device: ManuallyDrop::new(device),
            config,
            arena,
            arena_block: ManuallyDrop::new(arena_block),
            textures: TextureStore::new(),
            state: RenderState::new(mode.bounds()),
            stats,
            released: false,
            _claim: claim,
        })
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn arena(&self) -> &VertexArena {
        &self.arena
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn frame_stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Portable formats `create_texture` accepts, in preference order.
    pub fn supported_texture_formats(&self) -> &'static [PixelFormat] {
        &SUPPORTED_TEXTURE_FORMATS
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Allocates zeroed native storage for a new texture.
    pub fn create_texture(
        &mut self,
        format: PixelFormat,
        access: TextureAccess,
        width: u32,
        height: u32,
    ) -> Result<TextureId> {
        let layout = TextureLayout::plan(format, access, width, height, self.config.max_texture_size)?;
        let block = self
            .device
            .alloc_contiguous(layout.alloc_size)
            .ok_or(RenderError::OutOfMemory {
                requested: layout.alloc_size,
            })?;
        self.device.bytes_mut(&block).fill(0);

        let id = self.textures.next_id();
        log::debug!(
            "texture {id}: {width}x{height} {format} {access:?}, {} bytes{}",
            layout.alloc_size,
            if layout.tiled { ", tiled" } else { "" }
        );
        self.textures
            .insert(Texture::new(id, block, format, access, width, height, layout));
        Ok(id)
    }

    /// Frees a texture's storage.
    ///
    /// When the GPU may still touch it (bound as render target or sampler)
    /// this waits for idle first, and a bound target falls back to the back
    /// buffer.
    pub fn destroy_texture(&mut self, id: TextureId) -> Result<()> {
        self.textures.get(id)?;

        let is_target = self.state.target == Some(id);
        let is_sampled = self.state.texture == Some(id);
        if is_target || is_sampled {
            self.wait_idle();
        }
        if is_target {
            self.set_render_target(None)?;
        }
        if is_sampled {
            self.state.texture = None;
        }

        let texture = self.textures.remove(id)?;
        self.device.free_contiguous(texture.block);
        log::debug!("texture {id} destroyed");
        Ok(())
    }

    /// Exposes `rect` (the whole texture when `None`) of a linear texture for writing.
    pub fn lock_texture(&mut self, id: TextureId, rect: Option<Rect>) -> Result<TextureLock<'_>> {
        let texture = self.textures.get(id)?;
        if texture.is_tiled() {
            return Err(RenderError::NotLockable(id.raw()));
        }
        let rect = rect.unwrap_or(texture.bounds());
        texture.check_rect(rect)?;

        let start = texture.linear_offset(rect.x, rect.y);
        let pitch = texture.pitch();
        let storage = self.device.bytes_mut(&texture.block);
        Ok(TextureLock::new(&mut storage[start..], pitch))
    }

    /// Writes `pixels` (rows `pitch` bytes apart, texture format) into `rect`.
    pub fn update_texture(&mut self, id: TextureId, rect: Option<Rect>, pixels: &[u8], pitch: usize) -> Result<()> {
        let texture = self.textures.get(id)?;
        let rect = rect.unwrap_or(texture.bounds());
        let storage = self.device.bytes_mut(&texture.block);
        texture.write_rect(storage, rect, pixels, pitch)
    }

    pub fn query_texture(&self, id: TextureId) -> Result<TextureInfo> {
        Ok(self.textures.get(id)?.info())
    }

    /// The texture's image as tightly packed rows, untiled.
    pub fn read_texture_pixels(&self, id: TextureId) -> Result<Vec<u8>> {
        let texture = self.textures.get(id)?;
        Ok(texture.read_linear(self.device.bytes(&texture.block)))
    }

    /// Points the colour surface at `target`, or back at the back buffer.
    pub fn set_render_target(&mut self, target: Option<TextureId>) -> Result<()> {
        let mode = self.device.video_mode();
        let zeta_pitch = mode.width * 4;

        let binding = match target {
            None => SurfaceBinding {
                dma_channel: nv097::DMA_CHANNEL_PIXEL_RENDERER,
                address: 0,
                pitch: mode.pitch() as u32,
                zeta_pitch,
                width: mode.width,
                height: mode.height,
                format: self.device.color_format().code(),
            },
            Some(id) => {
                let texture = self.textures.get(id)?;
                if texture.access != TextureAccess::Target {
                    return Err(RenderError::Unsupported("texture was not created as a render target"));
                }
                let (surface, _) = surface_format(texture.format)?;
                SurfaceBinding {
                    dma_channel: nv097::DMA_CHANNEL_3D_3,
                    address: texture.physical_address(),
                    pitch: texture.pitch() as u32,
                    zeta_pitch,
                    width: texture.width,
                    height: texture.height,
                    format: surface.code(),
                }
            }
        };

        let mut enc = PushEncoder::new();
        bind_surface(&mut enc, binding);
        self.state.target = target;
        sync_scissor(&mut enc, &mut self.state, (binding.width, binding.height));
        self.device.submit(enc.words());

        match target {
            Some(id) => log::debug!("render target -> texture {id}"),
            None => log::debug!("render target -> back buffer"),
        }
        Ok(())
    }

    // ── staging ───────────────────────────────────────────────────────────

    /// Copies vertex records into the arena, returning their byte offset.
    fn stage<V: bytemuck::Pod>(&mut self, vertices: &[V]) -> Result<usize> {
        if vertices.is_empty() {
            return Ok(0);
        }
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let span = self.arena.allocate(bytes.len())?;
        let storage = self.device.bytes_mut(&self.arena_block);
        storage[span.offset..span.offset + bytes.len()].copy_from_slice(bytes);
        Ok(span.offset)
    }

    pub fn queue_draw_points(&mut self, points: &[Vec2], blend: BlendMode) -> Result<DrawCall> {
        let first = self.stage(&stage_points(points))?;
        Ok(DrawCall {
            first,
            count: points.len(),
            blend,
        })
    }

    /// Stages a connected line strip through `points`.
    pub fn queue_draw_lines(&mut self, points: &[Vec2], blend: BlendMode) -> Result<DrawCall> {
        self.queue_draw_points(points, blend)
    }

    /// Validates, packs and stages a triangle list.
    pub fn queue_geometry(&mut self, input: &GeometryInput<'_>) -> Result<GeometryCall> {
        input.validate()?;
        let first = match input.texture {
            Some(id) => {
                let uv_scale = self.textures.get(id)?.uv_scale();
                self.stage(&stage_textured(input, uv_scale))?
            }
            None => self.stage(&stage_colored(input))?,
        };
        Ok(GeometryCall {
            texture: input.texture,
            first,
            count: input.draw_count(),
            blend: input.blend,
            filter: input.filter,
            address_u: input.address_u,
            address_v: input.address_v,
        })
    }

    /// Viewport changes travel in the command list; nothing to do up front.
    pub fn queue_set_viewport(&mut self, _viewport: Rect) -> Result<()> {
        Ok(())
    }

    /// Clip changes travel in the command list; nothing to do up front.
    pub fn queue_set_clip_rect(&mut self, _clip: Option<Rect>) -> Result<()> {
        Ok(())
    }

    /// Draw colour changes travel in the command list; nothing to do up front.
    pub fn queue_set_draw_color(&mut self, _color: FColor) -> Result<()> {
        Ok(())
    }

    // ── replay ────────────────────────────────────────────────────────────

    /// Replays `commands` against the device.
    ///
    /// A command that fails (a draw naming a destroyed texture) is logged
    /// and skipped; the rest still run and the first error is returned.
    pub fn run_command_queue(&mut self, commands: &CommandList) -> Result<()> {
        let vertex_base = self.arena_block.physical_address();
        let mut first_error = None;

        for command in commands {
            let step = Interpreter {
                device: &mut *self.device,
                state: &mut self.state,
                textures: &mut self.textures,
                vertex_base,
            }
            .execute(command);

            match step {
                Ok(Step::Continue) => {}
                Ok(Step::Present) => self.present(),
                Err(err) => {
                    log::warn!("skipping {command:?}: {err}");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Forces the next commands to re-emit blend, combiner, texture and scissor.
    pub fn invalidate_cached_state(&mut self) {
        self.state.invalidate();
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Finishes the frame and flips on the next vertical blank.
    ///
    /// Waits until the GPU has consumed every submitted scope and the
    /// previous flip completed, so the arena slot about to be recycled is
    /// no longer read.
    pub fn present(&mut self) {
        if self.config.show_fps {
            let label = self.stats.label();
            self.device.draw_debug_text(&label);
        }

        self.wait_idle();
        while self.device.frame_pending() {
            std::thread::yield_now();
        }

        if self.config.show_fps && self.stats.end_frame() {
            log::info!("{}", self.stats.label());
        }

        self.device.wait_for_vblank();
        self.arena.advance_frame();

        if self.config.show_fps {
            self.stats.begin_frame();
        }
        self.device.reset();
        let bounds = self.device.video_mode().bounds();
        self.device.erase_depth_stencil(bounds);
    }

    /// Always fails: presents are locked to vertical blank.
    pub fn set_vsync(&mut self, _enabled: bool) -> Result<()> {
        Err(RenderError::Unsupported("vsync control"))
    }

    /// Reads `rect` of the bound surface, converted to `format`.
    ///
    /// Blocks until the GPU is idle. Reads the render target when one is
    /// bound, the back buffer otherwise.
    pub fn read_pixels(&mut self, rect: Rect, format: PixelFormat) -> Result<PixelSurface> {
        let mut enc = PushEncoder::new();
        idle_barrier(&mut enc);
        self.device.submit(enc.words());
        self.wait_idle();
        self.device.flush_framebuffer();

        let (width, height) = target_size(&*self.device, &self.state, &self.textures);
        if !rect.fits_within(width, height) {
            return Err(RenderError::InvalidRect {
                x: rect.x,
                y: rect.y,
                w: rect.w,
                h: rect.h,
                bound_w: width,
                bound_h: height,
            });
        }

        let pitch = rect.w as usize * format.bytes_per_pixel();
        let mut pixels = vec![0u8; pitch * rect.h as usize];
        if !rect.is_empty() {
            let target = self.state.target.and_then(|id| self.textures.get(id).ok());
            let (src, src_pitch, src_format) = match target {
                Some(texture) => (self.device.bytes(&texture.block), texture.pitch(), texture.format),
                None => {
                    let mode = self.device.video_mode();
                    (self.device.back_buffer_pixels(), mode.pitch(), mode.pixel_format())
                }
            };
            let start = rect.y as usize * src_pitch + rect.x as usize * src_format.bytes_per_pixel();
            convert_pixels(
                rect.w as usize,
                rect.h as usize,
                src_format,
                &src[start..],
                src_pitch,
                format,
                &mut pixels,
                pitch,
            )?;
        }

        Ok(PixelSurface {
            width: rect.w as u32,
            height: rect.h as u32,
            pitch,
            format,
            pixels,
        })
    }

    /// Frees every texture and the arena and hands the device back.
    pub fn destroy(mut self) -> D {
        self.release();
        self.released = true;
        // SAFETY: `released` keeps `drop` away from the device from here on.
        unsafe { ManuallyDrop::take(&mut self.device) }
    }

    /// Waits for the GPU, then frees every texture and the arena block.
    ///
    /// Called exactly once, from `destroy` or from `drop`.
    fn release(&mut self) {
        self.wait_idle();
        let textures: Vec<Texture> = self.textures.drain().collect();
        for texture in textures {
            self.device.free_contiguous(texture.block);
        }
        // SAFETY: nothing reads the arena block after release.
        let arena_block = unsafe { ManuallyDrop::take(&mut self.arena_block) };
        self.device.free_contiguous(arena_block);
        log::info!("renderer destroyed");
    }

    fn wait_idle(&mut self) {
        while self.device.is_busy() {
            std::thread::yield_now();
        }
    }
}

impl<D: Device> Drop for Renderer<D> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.release();
        // SAFETY: `destroy` never ran, so the device is still owned here and dropped once.
        unsafe { ManuallyDrop::drop(&mut self.device) }
    }
}

impl<D: Device> std::fmt::Debug for Renderer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("mode", &self.device.video_mode())
            .field("config", &self.config)
            .field("arena", &self.arena)
            .field("textures", &self.textures.len())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::device::{NativeMemory, PushBuffer, SoftDevice, VideoMode};
    use crate::format::SurfaceFormat;

    fn renderer() -> Renderer<SoftDevice> {
        let device = SoftDevice::new(VideoMode::new(640, 480, 32));
        RendererSlot::new()
            .create(device, RendererConfig::default())
            .unwrap()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn init_leaves_a_reset_device() {
        let r = renderer();
        assert_eq!(r.device().stats().resets, 1);
        assert_eq!(r.device().stats().submissions, 1);
        assert_eq!(r.arena().capacity(), 1 << 20);
    }

    #[test]
    fn arena_allocation_failure_aborts_and_releases_slot() {
        let slot = RendererSlot::new();
        let device = SoftDevice::new(VideoMode::new(640, 480, 32)).with_memory_budget(4096);
        let err = slot.create(device, RendererConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::OutOfMemory { .. }));
        assert!(!slot.is_claimed());
    }

    #[test]
    fn destroy_returns_all_memory() {
        let mut r = renderer();
        r.create_texture(PixelFormat::Argb8888, TextureAccess::Static, 16, 16).unwrap();
        r.create_texture(PixelFormat::Rgb565, TextureAccess::Streaming, 16, 16).unwrap();
        let device = r.destroy();
        assert_eq!(device.stats().live_blocks, 0);
    }

    /// Soft device that reports its live block count when dropped.
    struct Tracked {
        inner: SoftDevice,
        live_at_drop: Rc<Cell<Option<usize>>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.live_at_drop.set(Some(self.inner.stats().live_blocks));
        }
    }

    impl PushBuffer for Tracked {
        fn video_mode(&self) -> VideoMode {
            self.inner.video_mode()
        }
        fn set_color_format(&mut self, format: SurfaceFormat) {
            self.inner.set_color_format(format)
        }
        fn color_format(&self) -> SurfaceFormat {
            self.inner.color_format()
        }
        fn submit(&mut self, words: &[u32]) {
            self.inner.submit(words)
        }
        fn is_busy(&mut self) -> bool {
            self.inner.is_busy()
        }
        fn frame_pending(&mut self) -> bool {
            self.inner.frame_pending()
        }
        fn wait_for_vblank(&mut self) {
            self.inner.wait_for_vblank()
        }
        fn reset(&mut self) {
            self.inner.reset()
        }
        fn erase_depth_stencil(&mut self, rect: Rect) {
            self.inner.erase_depth_stencil(rect)
        }
        fn back_buffer_pixels(&self) -> &[u8] {
            self.inner.back_buffer_pixels()
        }
        fn flush_framebuffer(&mut self) {
            self.inner.flush_framebuffer()
        }
    }

    impl NativeMemory for Tracked {
        fn alloc_contiguous(&mut self, size: usize) -> Option<MemoryBlock> {
            self.inner.alloc_contiguous(size)
        }
        fn free_contiguous(&mut self, block: MemoryBlock) {
            self.inner.free_contiguous(block)
        }
        fn bytes(&self, block: &MemoryBlock) -> &[u8] {
            self.inner.bytes(block)
        }
        fn bytes_mut(&mut self, block: &MemoryBlock) -> &mut [u8] {
            self.inner.bytes_mut(block)
        }
    }

    #[test]
    fn dropping_the_renderer_frees_native_memory() {
        let live = Rc::new(Cell::new(None));
        let device = Tracked {
            inner: SoftDevice::new(VideoMode::new(640, 480, 32)).with_busy_polls(2),
            live_at_drop: Rc::clone(&live),
        };
        let slot = RendererSlot::new();
        let mut r = slot.create(device, RendererConfig::default()).unwrap();
        r.create_texture(PixelFormat::Argb8888, TextureAccess::Target, 32, 32).unwrap();
        assert_eq!(r.device().inner.stats().live_blocks, 2);

        drop(r);
        assert_eq!(live.get(), Some(0));
        assert!(!slot.is_claimed());
    }

    #[test]
    fn destroyed_renderer_drops_the_device_only_with_its_owner() {
        let live = Rc::new(Cell::new(None));
        let device = Tracked {
            inner: SoftDevice::new(VideoMode::new(640, 480, 32)),
            live_at_drop: Rc::clone(&live),
        };
        let r = RendererSlot::new().create(device, RendererConfig::default()).unwrap();
        let device = r.destroy();
        assert_eq!(live.get(), None);
        drop(device);
        assert_eq!(live.get(), Some(0));
    }

    // ── textures ──────────────────────────────────────────────────────────

    #[test]
    fn new_textures_are_zeroed() {
        let mut r = renderer();
        let id = r.create_texture(PixelFormat::Argb8888, TextureAccess::Streaming, 8, 8).unwrap();
        assert!(r.read_texture_pixels(id).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn lock_writes_land_in_the_texture() {
        let mut r = renderer();
        let id = r.create_texture(PixelFormat::Rgb565, TextureAccess::Streaming, 4, 4).unwrap();
        {
            let mut lock = r.lock_texture(id, Some(Rect::new(1, 2, 2, 1))).unwrap();
            lock.row_mut(0, 4).unwrap().copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
            lock.unlock();
        }
        let pixels = r.read_texture_pixels(id).unwrap();
        let at = 2 * 8 + 2;
        assert_eq!(&pixels[at..at + 4], &[0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn non_target_texture_cannot_be_bound() {
        let mut r = renderer();
        let id = r.create_texture(PixelFormat::Argb8888, TextureAccess::Streaming, 8, 8).unwrap();
        assert!(matches!(r.set_render_target(Some(id)), Err(RenderError::Unsupported(_))));
    }

    #[test]
    fn destroying_bound_target_rebinds_back_buffer() {
        let mut r = renderer();
        let id = r.create_texture(PixelFormat::Argb8888, TextureAccess::Target, 32, 32).unwrap();
        r.set_render_target(Some(id)).unwrap();
        r.destroy_texture(id).unwrap();
        assert_eq!(r.state().target, None);
        assert_eq!(
            r.device().last_args(nv097::SET_CONTEXT_DMA_COLOR),
            Some(&[nv097::DMA_CHANNEL_PIXEL_RENDERER][..])
        );
        assert!(matches!(r.query_texture(id), Err(RenderError::InvalidTexture(_))));
    }

    // ── staging ───────────────────────────────────────────────────────────

    #[test]
    fn geometry_lands_in_the_arena() {
        let mut r = renderer();
        let xy = [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)];
        let colors = [FColor::WHITE; 3];
        let call = r.queue_geometry(&GeometryInput::new(&xy, &colors)).unwrap();
        assert_eq!(call.count, 3);
        assert_eq!(r.arena().cursor(), 64);

        let bytes = r.device.bytes(&r.arena_block);
        let pos: [f32; 2] = bytemuck::pod_read_unaligned(&bytes[call.first + 12..call.first + 20]);
        assert_eq!(pos, [3.0, 4.0]);
    }

    #[test]
    fn invalid_geometry_reserves_nothing() {
        let mut r = renderer();
        let xy = [Vec2::new(0.0, 0.0); 3];
        let colors = [FColor::WHITE; 2];
        assert!(r.queue_geometry(&GeometryInput::new(&xy, &colors)).is_err());
        assert_eq!(r.arena().cursor(), 0);
    }

    #[test]
    fn vsync_is_unsupported() {
        let mut r = renderer();
        assert!(matches!(r.set_vsync(false), Err(RenderError::Unsupported(_))));
    }
}
