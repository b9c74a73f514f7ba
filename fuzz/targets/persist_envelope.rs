#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

use lazyrec::{read_record, write_record, ZdbCodec};

fuzz_target!(|data: &[u8]| {
    let codec = ZdbCodec::new().shared();
    let mut cursor = Cursor::new(data);

    // Чтение конверта не должно паниковать ни на каких данных.
    let Ok(mut record) = read_record(&mut cursor, codec.clone()) else {
        return;
    };

    // Прочитанную запись можно записать обратно и получить равную.
    let mut buf = Vec::new();
    write_record(&mut buf, &record).expect("re-encoding a restored record");
    let mut again = read_record(&mut Cursor::new(buf), codec).expect("reading re-encoded record");
    assert_eq!(again, record);

    let _ = record.materialize();
    let _ = again.field_count();
});
