/// Address of an actor inside one runtime node.
///
/// The high byte carries the harbor (cluster node) id; the rest is local.
pub type ActorHandle = u32;

/// Handle value meaning "no actor". Hang detectors use it to mark a worker idle.
pub const NO_ACTOR: ActorHandle = 0;

/// Number of bits reserved for the local part of an [`ActorHandle`].
pub const HANDLE_REMOTE_SHIFT: u32 = 24;

/// Mask selecting the local part of an [`ActorHandle`].
pub const HANDLE_MASK: ActorHandle = 0x00ff_ffff;

/// Harbor id encoded in `handle`.
pub fn harbor_of(handle: ActorHandle) -> u8 {
    (handle >> HANDLE_REMOTE_SHIFT) as u8
}
