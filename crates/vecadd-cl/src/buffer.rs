//! Typ-State-Gerätepuffer für `cl_int`-Vektoren.
//!
//! ```text
//! Queued ──enqueue_write──▶ InFlight ──into_ready(guard)──▶ Ready ──read_into──▶ Host
//!    └──────launch (Kernel-Ausgabe)──▶ InFlight
//! ```

use crate::ClError;
use bytemuck::{cast_slice, cast_slice_mut};
use opencl3::{
    command_queue::CommandQueue,
    context::Context,
    event::Event,
    memory::{Buffer, CL_MEM_READ_ONLY, CL_MEM_READ_WRITE, CL_MEM_WRITE_ONLY},
    types::{cl_int, cl_mem_flags, CL_BLOCKING, CL_NON_BLOCKING},
};
use std::{marker::PhantomData, mem::size_of, ptr};

#[cfg(feature = "metrics")]
use crate::metrics::{record, ALLOCS, ALLOC_BYTES};
#[cfg(feature = "metrics")]
use std::{sync::atomic::Ordering, time::Instant};

// ─── Typ‑State‑Marker ────────────────────────────────────────────────
mod sealed {
    pub trait Sealed {}
}

pub trait State: sealed::Sealed {}

pub struct Queued;
impl sealed::Sealed for Queued {}
impl State for Queued {}

pub struct InFlight;
impl sealed::Sealed for InFlight {}
impl State for InFlight {}

pub struct Ready;
impl sealed::Sealed for Ready {}
impl State for Ready {}

/// Zugriffsrecht des Kernels auf den Puffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    fn flags(self) -> cl_mem_flags {
        match self {
            Access::ReadOnly => CL_MEM_READ_ONLY,
            Access::WriteOnly => CL_MEM_WRITE_ONLY,
            Access::ReadWrite => CL_MEM_READ_WRITE,
        }
    }
}

// ─── Gerätevektor ────────────────────────────────────────────────────

/// `len` zählt Elemente, der OpenCL-Puffer selbst ist byteweise angelegt.
pub struct DeviceVec<S: State> {
    buf: Buffer<u8>,
    len: usize,
    _state: PhantomData<S>,
}

impl<S: State> std::fmt::Debug for DeviceVec<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceVec")
            .field("len", &self.len)
            .field("state", &std::any::type_name::<S>())
            .finish()
    }
}

impl<S: State> DeviceVec<S> {
    fn transition<T: State>(self) -> DeviceVec<T> {
        DeviceVec { buf: self.buf, len: self.len, _state: PhantomData }
    }

    /// Zugriff auf die interne OpenCL Buffer-Referenz
    pub fn raw(&self) -> &Buffer<u8> {
        &self.buf
    }

    /// Länge in Elementen
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn size_bytes(&self) -> usize {
        self.len * size_of::<cl_int>()
    }
}

// ── Queued ───────────────────────────────────────────────────────────
impl DeviceVec<Queued> {
    /// legt einen neuen Gerätepuffer für `len` Elemente an, noch **nicht** befüllt
    pub fn new(ctx: &Context, len: usize, access: Access) -> Result<Self, ClError> {
        // OpenCL lehnt Puffer der Größe 0 ab
        if len == 0 {
            return Err(ClError::InvalidSize(len));
        }
        let bytes = len
            .checked_mul(size_of::<cl_int>())
            .ok_or(ClError::InvalidSize(len))?;

        #[cfg(feature = "metrics")]
        let t = Instant::now();

        // Safety: kein Host-Pointer, OpenCL allokiert selbst
        let buf = unsafe { Buffer::<u8>::create(ctx, access.flags(), bytes, ptr::null_mut())? };

        #[cfg(feature = "metrics")]
        {
            record("alloc", t);
            ALLOCS.fetch_add(1, Ordering::Relaxed);
            ALLOC_BYTES.fetch_add(bytes, Ordering::Relaxed);
        }

        Ok(Self { buf, len, _state: PhantomData })
    }

    /// Host → Gerät, nicht blockierend. `host` bleibt bis zum Guard geliehen.
    pub fn enqueue_write<'h>(
        mut self,
        queue: &CommandQueue,
        host: &'h [cl_int],
    ) -> Result<(DeviceVec<InFlight>, EventGuard<'h>), ClError> {
        if host.len() != self.len {
            return Err(ClError::LengthMismatch { left: self.len, right: host.len() });
        }

        #[cfg(feature = "metrics")]
        let t = Instant::now();

        // Safety: Host-Slice lebt mindestens so lange wie der EventGuard
        let evt = unsafe {
            queue.enqueue_write_buffer(&mut self.buf, CL_NON_BLOCKING, 0, cast_slice(host), &[])?
        };

        #[cfg(feature = "metrics")]
        record("enqueue_write", t);

        Ok((self.transition(), EventGuard::new(evt)))
    }

    /// Ausgabepuffer: wird vom Kernel beschrieben, nicht vom Host
    pub fn launch(self) -> DeviceVec<InFlight> {
        self.transition()
    }
}

// ── InFlight ─────────────────────────────────────────────────────────
impl DeviceVec<InFlight> {
    /// wartet auf das Event und überführt in Ready‑State
    pub fn into_ready(self, guard: EventGuard<'_>) -> Result<DeviceVec<Ready>, ClError> {
        #[cfg(feature = "metrics")]
        let t = Instant::now();

        guard.wait()?;

        #[cfg(feature = "metrics")]
        record("wait", t);

        Ok(self.transition())
    }
}

// ── Ready → Host (D2H) ───────────────────────────────────────────────
impl DeviceVec<Ready> {
    /// blockierendes Zurücklesen in `host`
    pub fn read_into(&self, queue: &CommandQueue, host: &mut [cl_int]) -> Result<(), ClError> {
        if host.len() != self.len {
            return Err(ClError::LengthMismatch { left: self.len, right: host.len() });
        }

        #[cfg(feature = "metrics")]
        let t = Instant::now();

        // Safety: CL_BLOCKING, der Slice wird erst nach Rückkehr wieder frei
        unsafe {
            queue.enqueue_read_buffer(&self.buf, CL_BLOCKING, 0, cast_slice_mut(host), &[])?;
        }

        #[cfg(feature = "metrics")]
        record("enqueue_read", t);

        Ok(())
    }
}

// ── Guard (wartet bei Drop auf Event) ────────────────────────────────
pub struct EventGuard<'h> {
    evt: Option<Event>,
    _host: PhantomData<&'h [cl_int]>,
}

impl EventGuard<'_> {
    pub(crate) fn new(evt: Event) -> Self {
        Self { evt: Some(evt), _host: PhantomData }
    }

    /// Explizites Wait, Fehler werden anders als im Drop weitergereicht
    pub fn wait(mut self) -> Result<(), ClError> {
        match self.evt.take() {
            Some(evt) => evt.wait().map_err(ClError::from),
            None => Ok(()),
        }
    }
}

impl Drop for EventGuard<'_> {
    fn drop(&mut self) {
        if let Some(evt) = self.evt.take() {
            let _ = evt.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_maps_to_mem_flags() {
        assert_eq!(Access::ReadOnly.flags(), CL_MEM_READ_ONLY);
        assert_eq!(Access::WriteOnly.flags(), CL_MEM_WRITE_ONLY);
        assert_eq!(Access::ReadWrite.flags(), CL_MEM_READ_WRITE);
    }

    #[test]
    fn byte_view_of_host_ints() {
        let host: [cl_int; 3] = [1, -1, 7];
        let bytes: &[u8] = cast_slice(&host);
        assert_eq!(bytes.len(), 3 * size_of::<cl_int>());
        assert_eq!(&bytes[..4], &1_i32.to_ne_bytes());
    }
}
