//! USB command link
//!
//! One request, one reply: read a frame from the bulk OUT endpoint,
//! run it through the instrument, write the answer to the bulk IN
//! endpoint. The endpoints vanish whenever the host detaches or the
//! bus resets; waiting for them to come back is the entire reconnect
//! story.

use defmt::{debug, info};
use embassy_usb::driver::{Endpoint, EndpointIn, EndpointOut};

use crate::BoardInstrument;

/// Bulk endpoint packet size. Every command and every reply fits in
/// one packet.
pub const PACKET_LEN: u16 = 64;

/// Serve the command protocol until the endpoints go away, forever.
pub async fn serve<Out, In>(
    instrument: &mut BoardInstrument,
    read_ep: &mut Out,
    write_ep: &mut In,
) -> !
where
    Out: EndpointOut,
    In: EndpointIn,
{
    loop {
        read_ep.wait_enabled().await;
        info!("Command link up");

        loop {
            let mut buf = [0u8; PACKET_LEN as usize];
            let n = match read_ep.read(&mut buf).await {
                Ok(n) => n,
                Err(_) => break,
            };

            let frame = &buf[..n];
            let reply = instrument.handle(frame);
            debug!("{=[u8]:a} -> {=[u8]:a}", frame, reply.as_bytes());

            if write_ep.write(reply.as_bytes()).await.is_err() {
                break;
            }
        }

        info!("Command link down");
    }
}
