/*!
A multi-version OpenFlow wire protocol codec.

Decodes switch and controller messages of OpenFlow 1.0, 1.3, 1.4 and 1.5
into one logical message model and encodes them back.

```no_run
use ofcodec::openflow::Codec;

let codec = Codec::with_defaults();
let msg = codec.decode(&[0x04, 0x02, 0x00, 0x08, 0, 0, 0, 1]).unwrap();
println!("{:?}", msg.message);
```
*/

#[macro_use]
extern crate log;

pub mod openflow;
