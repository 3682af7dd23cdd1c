use std::collections::BTreeMap;

use crate::coords::Rect;
use crate::format::{pack_argb, PixelFormat, SurfaceFormat};

use super::encoder::{decode_methods, MethodCall};
use super::memory::{MemoryBlock, NativeMemory};
use super::nv097;
use super::{PushBuffer, VideoMode};

/// First physical address handed out; below it sits the scan-out memory.
const PHYSICAL_BASE: u32 = 0x0100_0000;
const PAGE_SIZE: usize = 4096;
/// Fresh allocations are filled with this byte, as real memory is not zeroed.
const UNINIT_BYTE: u8 = 0xA5;

/// Counters describing what a [`SoftDevice`] was asked to do.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SoftStats {
    pub submissions: usize,
    pub idle_polls: usize,
    pub frame_polls: usize,
    pub vblank_waits: usize,
    pub resets: usize,
    pub depth_clears: usize,
    pub framebuffer_flushes: usize,
    pub surface_clears: usize,
    pub allocated_bytes: usize,
    pub live_blocks: usize,
}

/// Surface registers the software device tracks to emulate clears.
#[derive(Debug, Clone)]
struct SurfaceRegs {
    dma_color: u32,
    color_offset: u32,
    color_pitch: u32,
    format: u32,
    clear_h: u32,
    clear_v: u32,
    clear_value: u32,
}

/// Recording push-buffer device backed by plain heap memory.
///
/// Every submitted scope is decoded and appended to a method log. Surface
/// clears are carried out on the back buffer or on the render-target
/// texture the colour registers point at; geometry is only recorded.
pub struct SoftDevice {
    mode: VideoMode,
    color_format: SurfaceFormat,
    back_buffer: Vec<u8>,
    memory: BTreeMap<u32, Vec<u8>>,
    next_physical: u32,
    memory_budget: Option<usize>,
    busy_polls: usize,
    busy_left: usize,
    pending_left: usize,
    regs: SurfaceRegs,
    calls: Vec<MethodCall>,
    debug_text: Vec<String>,
    stats: SoftStats,
}

impl SoftDevice {
    pub fn new(mode: VideoMode) -> Self {
        let color_format = mode.surface_format();
        Self {
            mode,
            color_format,
            back_buffer: vec![0; mode.pitch() * mode.height as usize],
            memory: BTreeMap::new(),
            next_physical: PHYSICAL_BASE,
            memory_budget: None,
            busy_polls: 0,
            busy_left: 0,
            pending_left: 0,
            regs: SurfaceRegs {
                dma_color: nv097::DMA_CHANNEL_PIXEL_RENDERER,
                color_offset: 0,
                color_pitch: mode.pitch() as u32,
                format: nv097::surface_format(color_format.code()),
                clear_h: nv097::span(0, mode.width),
                clear_v: nv097::span(0, mode.height),
                clear_value: 0,
            },
            calls: Vec::new(),
            debug_text: Vec::new(),
            stats: SoftStats::default(),
        }
    }

    /// Caps the total bytes of live contiguous allocations.
    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget = Some(bytes);
        self
    }

    /// Number of polls `is_busy` / `frame_pending` report `true` after each submission.
    pub fn with_busy_polls(mut self, polls: usize) -> Self {
        self.busy_polls = polls;
        self
    }

    pub fn stats(&self) -> &SoftStats {
        &self.stats
    }

    /// Method groups received so far, in submission order.
    pub fn calls(&self) -> &[MethodCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<MethodCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of groups targeting `method`.
    pub fn count(&self, method: u32) -> usize {
        self.calls.iter().filter(|c| c.method == method).count()
    }

    /// Arguments of the last group targeting `method`.
    pub fn last_args(&self, method: u32) -> Option<&[u32]> {
        self.calls
            .iter()
            .rev()
            .find(|c| c.method == method)
            .map(|c| c.args.as_slice())
    }

    /// Every string handed to the text overlay.
    pub fn debug_text(&self) -> &[String] {
        &self.debug_text
    }

    /// Block-relative view of the allocation containing `physical`.
    fn region_mut(&mut self, physical: u32) -> Option<&mut [u8]> {
        let (&base, block) = self.memory.range_mut(..=physical).next_back()?;
        let start = (physical - base) as usize;
        block.get_mut(start..)
    }

    fn execute(&mut self, call: &MethodCall) {
        for (reg, value) in call.registers() {
            match reg {
                nv097::SET_CONTEXT_DMA_COLOR => self.regs.dma_color = value,
                nv097::SET_SURFACE_COLOR_OFFSET => self.regs.color_offset = value,
                nv097::SET_SURFACE_PITCH => self.regs.color_pitch = value & 0xFFFF,
                nv097::SET_SURFACE_FORMAT => self.regs.format = value,
                nv097::SET_CLEAR_RECT_HORIZONTAL => self.regs.clear_h = value,
                nv097::SET_CLEAR_RECT_VERTICAL => self.regs.clear_v = value,
                nv097::SET_COLOR_CLEAR_VALUE => self.regs.clear_value = value,
                nv097::CLEAR_SURFACE if value & nv097::CLEAR_SURFACE_COLOR != 0 => self.clear_surface(),
                _ => {}
            }
        }
    }

    fn clear_surface(&mut self) {
        let code = nv097::surface_format_color(self.regs.format);
        let format = SurfaceFormat::from_code(code)
            .map(SurfaceFormat::pixel_format)
            .unwrap_or(PixelFormat::Argb8888);

        let texel = match pack_argb(format, self.regs.clear_value) {
            Ok(texel) => texel,
            Err(err) => {
                log::warn!("soft device: cannot clear surface: {err}");
                return;
            }
        };

        let (x, w) = nv097::unspan(self.regs.clear_h);
        let (y, h) = nv097::unspan(self.regs.clear_v);
        let pitch = self.regs.color_pitch as usize;
        let bpp = texel.len();

        let target = if self.regs.dma_color == nv097::DMA_CHANNEL_3D_3 {
            let offset = self.regs.color_offset;
            match self.region_mut(offset) {
                Some(region) => region,
                None => {
                    log::warn!("soft device: colour offset {offset:#x} is not mapped");
                    return;
                }
            }
        } else {
            &mut self.back_buffer[..]
        };

        for row in y as usize..(y + h) as usize {
            for col in x as usize..(x + w) as usize {
                let at = row * pitch + col * bpp;
                if let Some(px) = target.get_mut(at..at + bpp) {
                    px.copy_from_slice(&texel);
                }
            }
        }
        self.stats.surface_clears += 1;
    }
}

impl PushBuffer for SoftDevice {
    fn video_mode(&self) -> VideoMode {
        self.mode
    }

    fn set_color_format(&mut self, format: SurfaceFormat) {
        self.color_format = format;
        self.regs.format = nv097::surface_format(format.code());
    }

    fn color_format(&self) -> SurfaceFormat {
        self.color_format
    }

    fn submit(&mut self, words: &[u32]) {
        self.stats.submissions += 1;
        self.busy_left = self.busy_polls;
        self.pending_left = self.busy_polls;

        match decode_methods(words) {
            Ok(calls) => {
                for call in &calls {
                    self.execute(call);
                }
                self.calls.extend(calls);
            }
            Err(err) => log::error!("soft device: dropping scope: {err}"),
        }
    }

    fn is_busy(&mut self) -> bool {
        self.stats.idle_polls += 1;
        if self.busy_left > 0 {
            self.busy_left -= 1;
            return true;
        }
        false
    }

    fn frame_pending(&mut self) -> bool {
        self.stats.frame_polls += 1;
        if self.pending_left > 0 {
            self.pending_left -= 1;
            return true;
        }
        false
    }

    fn wait_for_vblank(&mut self) {
        self.stats.vblank_waits += 1;
    }

    fn reset(&mut self) {
        self.stats.resets += 1;
    }

    fn erase_depth_stencil(&mut self, _rect: Rect) {
        self.stats.depth_clears += 1;
    }

    fn back_buffer_pixels(&self) -> &[u8] {
        &self.back_buffer
    }

    fn flush_framebuffer(&mut self) {
        self.stats.framebuffer_flushes += 1;
    }

    fn draw_debug_text(&mut self, text: &str) {
        self.debug_text.push(text.to_owned());
    }
}

impl NativeMemory for SoftDevice {
    fn alloc_contiguous(&mut self, size: usize) -> Option<MemoryBlock> {
        let reserved = size.checked_next_multiple_of(PAGE_SIZE)?.max(PAGE_SIZE);
        if let Some(budget) = self.memory_budget {
            if self.stats.allocated_bytes + reserved > budget {
                return None;
            }
        }
        let physical = self.next_physical;
        self.next_physical = physical.checked_add(u32::try_from(reserved).ok()?)?;

        self.memory.insert(physical, vec![UNINIT_BYTE; size]);
        self.stats.allocated_bytes += reserved;
        self.stats.live_blocks += 1;
        Some(MemoryBlock::new(physical, size))
    }

    fn free_contiguous(&mut self, block: MemoryBlock) {
        if self.memory.remove(&block.physical_address()).is_some() {
            let reserved = block.len().next_multiple_of(PAGE_SIZE).max(PAGE_SIZE);
            self.stats.allocated_bytes -= reserved;
            self.stats.live_blocks -= 1;
        } else {
            log::warn!("soft device: freeing unknown block {:#x}", block.physical_address());
        }
    }

    fn bytes(&self, block: &MemoryBlock) -> &[u8] {
        self.memory
            .get(&block.physical_address())
            .map_or(&[], Vec::as_slice)
    }

    fn bytes_mut(&mut self, block: &MemoryBlock) -> &mut [u8] {
        self.memory
            .get_mut(&block.physical_address())
            .map_or(&mut [], Vec::as_mut_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::PushEncoder;

    fn device() -> SoftDevice {
        SoftDevice::new(VideoMode::new(64, 32, 32))
    }

    // ── memory ────────────────────────────────────────────────────────────

    #[test]
    fn allocations_are_page_spaced_and_freed() {
        let mut dev = device();
        let a = dev.alloc_contiguous(100).unwrap();
        let b = dev.alloc_contiguous(5000).unwrap();
        assert_eq!(a.physical_address(), PHYSICAL_BASE);
        assert_eq!(b.physical_address(), PHYSICAL_BASE + 4096);
        assert_eq!(dev.bytes(&b).len(), 5000);
        assert_eq!(dev.stats().allocated_bytes, 4096 + 8192);

        dev.free_contiguous(a);
        dev.free_contiguous(b);
        assert_eq!(dev.stats().allocated_bytes, 0);
        assert_eq!(dev.stats().live_blocks, 0);
    }

    #[test]
    fn budget_limits_allocation() {
        let mut dev = device().with_memory_budget(8192);
        assert!(dev.alloc_contiguous(8192).is_some());
        assert!(dev.alloc_contiguous(1).is_none());
    }

    // ── push buffer ───────────────────────────────────────────────────────

    #[test]
    fn busy_polls_count_down_after_submit() {
        let mut dev = device().with_busy_polls(2);
        dev.submit(&PushEncoder::new().push1(nv097::NO_OPERATION, 0).words().to_vec());
        assert!(dev.is_busy());
        assert!(dev.is_busy());
        assert!(!dev.is_busy());
        assert_eq!(dev.stats().idle_polls, 3);
    }

    #[test]
    fn clear_fills_back_buffer_rect() {
        let mut dev = device();
        let mut enc = PushEncoder::new();
        enc.push1(nv097::SET_CLEAR_RECT_HORIZONTAL, nv097::span(2, 3))
            .push1(nv097::SET_CLEAR_RECT_VERTICAL, nv097::span(1, 2))
            .push1(nv097::SET_COLOR_CLEAR_VALUE, 0xFF11_2233)
            .push1(nv097::CLEAR_SURFACE, nv097::CLEAR_SURFACE_COLOR);
        dev.submit(enc.words());

        let pitch = dev.video_mode().pitch();
        let px = |x: usize, y: usize| {
            let at = y * pitch + x * 4;
            u32::from_le_bytes(dev.back_buffer_pixels()[at..at + 4].try_into().unwrap())
        };
        assert_eq!(px(2, 1), 0xFF11_2233);
        assert_eq!(px(4, 2), 0xFF11_2233);
        assert_eq!(px(5, 1), 0);
        assert_eq!(px(2, 3), 0);
        assert_eq!(dev.stats().surface_clears, 1);
    }

    #[test]
    fn clear_targets_texture_memory_when_redirected() {
        let mut dev = device();
        let block = dev.alloc_contiguous(4096).unwrap();
        let mut enc = PushEncoder::new();
        enc.push1(nv097::SET_CONTEXT_DMA_COLOR, nv097::DMA_CHANNEL_3D_3)
            .push1(nv097::SET_SURFACE_COLOR_OFFSET, block.physical_address())
            .push1(nv097::SET_SURFACE_PITCH, nv097::surface_pitch(64, 256))
            .push1(nv097::SET_SURFACE_FORMAT, nv097::surface_format(SurfaceFormat::R5g6b5.code()))
            .push1(nv097::SET_CLEAR_RECT_HORIZONTAL, nv097::span(0, 4))
            .push1(nv097::SET_CLEAR_RECT_VERTICAL, nv097::span(0, 4))
            .push1(nv097::SET_COLOR_CLEAR_VALUE, 0xFFFF_0000)
            .push1(nv097::CLEAR_SURFACE, nv097::CLEAR_SURFACE_COLOR);
        dev.submit(enc.words());

        let bytes = dev.bytes(&block);
        assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]), 0xF800);
        assert_eq!(u16::from_le_bytes([bytes[64 + 6], bytes[64 + 7]]), 0xF800);
        assert_eq!(bytes[8], UNINIT_BYTE);
        assert!(dev.back_buffer_pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn malformed_scope_is_dropped() {
        let mut dev = device();
        dev.submit(&[super::super::header(0, nv097::SET_BLEND_ENABLE, 3), 1]);
        assert!(dev.calls().is_empty());
        assert_eq!(dev.stats().submissions, 1);
    }
}
