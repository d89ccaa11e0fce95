/// Raw virtual address as read from a trace line.
pub type Address = u64;

/// Virtual page number.
pub type PageNumber = u64;

/// Physical frame index.
pub type FrameNumber = usize;

/// Page size is fixed at 4 KiB.
pub const PAGE_SHIFT: u32 = 12;
pub const PAGE_SIZE: u64 = 1 << PAGE_SHIFT;

pub fn page_of(address: Address) -> PageNumber {
    address >> PAGE_SHIFT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_of_drops_offset_bits() {
        assert_eq!(PAGE_SIZE, 4096);
        assert_eq!(page_of(0x0000_0FFF), 0);
        assert_eq!(page_of(0x0000_1000), 1);
        assert_eq!(page_of(0xCAFE_BABE), 0xCAFEB);
    }
}
