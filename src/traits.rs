use crate::cursor::ByteCursor;
use crate::errors::OrgResult;
use crate::writer::ByteWriter;

pub trait OrgParser {
    fn from_bytes(data: &mut ByteCursor) -> OrgResult<Self>
    where
        Self: Sized;
}

pub trait OrgWriter {
    fn to_bytes(&self, buffer: &mut ByteWriter) -> OrgResult<()>;
}
